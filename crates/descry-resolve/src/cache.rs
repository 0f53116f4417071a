// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Bookkeeping about which fragment each platform entity ended up in.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use descry_model::{DeclId, FqName};
use tracing::debug;

/// A package or class of the host platform, by qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlatformEntity {
    Package(FqName),
    Class(FqName),
}

#[derive(Debug, Default)]
struct Records {
    proper_packages: HashSet<FqName>,
    static_namespaces: HashSet<FqName>,
    owners: HashMap<PlatformEntity, DeclId>,
}

/// Written by the fragment merger on every successful resolution.
///
/// Records are never overwritten: the first fragment recorded for an
/// entity stays its owner.
#[derive(Debug, Default)]
pub struct ResolverCache {
    records: Mutex<Records>,
}

impl ResolverCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// `fq_name` names a real platform package.
    pub fn record_proper_package(&self, fq_name: &FqName) {
        self.lock().proper_packages.insert(fq_name.clone());
    }

    /// `fq_name` names a platform class exposed as a namespace.
    pub fn record_class_static_members_namespace(&self, fq_name: &FqName) {
        self.lock().static_namespaces.insert(fq_name.clone());
    }

    pub fn record_package(&self, entity: PlatformEntity, fragment: DeclId) {
        let mut records = self.lock();
        let owner = *records.owners.entry(entity.clone()).or_insert(fragment);
        if owner == fragment {
            debug!(?entity, %fragment, "recorded owning fragment");
        }
    }

    pub fn fragment_for(&self, entity: &PlatformEntity) -> Option<DeclId> {
        self.lock().owners.get(entity).copied()
    }

    pub fn is_proper_package(&self, fq_name: &FqName) -> bool {
        self.lock().proper_packages.contains(fq_name)
    }

    pub fn is_static_members_namespace(&self, fq_name: &FqName) -> bool {
        self.lock().static_namespaces.contains(fq_name)
    }

    fn lock(&self) -> MutexGuard<'_, Records> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
