// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Picks the scope that represents each qualified name.

use std::sync::Arc;

use descry_metadata::{NameTableRecord, PackageRecord, Payload};
use descry_model::{FqName, MemoizedCache};
use descry_platform::{package_class_fq_name, CompiledClass};
use tracing::{debug, warn};

use crate::cache::PlatformEntity;
use crate::error::ResolveError;
use crate::scope::{PackageFragment, Scope};
use crate::session::ResolutionSession;
use crate::static_members::should_create_static_members_package;

/// Maps qualified names to package fragments, at most once per name.
///
/// For a name that is a platform package, the package's compiled package
/// class wins if it carries valid package metadata; otherwise the reflected
/// package is used. For a name that is a platform class with static
/// members, the class becomes a namespace. Any other name does not resolve,
/// and that answer is cached too.
#[derive(Debug)]
pub struct FragmentMerger {
    package_class_name: String,
    fragments: MemoizedCache<FqName, Arc<PackageFragment>>,
}

impl FragmentMerger {
    pub fn new(package_class_name: impl Into<String>) -> Self {
        Self {
            package_class_name: package_class_name.into(),
            fragments: MemoizedCache::new("package fragments"),
        }
    }

    pub fn resolve(
        &self,
        session: &ResolutionSession,
        fq_name: &FqName,
    ) -> Result<Option<Arc<PackageFragment>>, ResolveError> {
        self.fragments
            .get_or_compute(fq_name, || self.create(session, fq_name))
    }

    /// `Some(answer)` once `fq_name` has been resolved, `None` before.
    pub fn cached(&self, fq_name: &FqName) -> Option<Option<Arc<PackageFragment>>> {
        self.fragments.get(fq_name)
    }

    fn create(
        &self,
        session: &ResolutionSession,
        fq_name: &FqName,
    ) -> Result<Option<Arc<PackageFragment>>, ResolveError> {
        let cache = session.resolver_cache();

        if let Some(package) = session.platform().find_package(fq_name) {
            let package_class = package_class_fq_name(fq_name, &self.package_class_name);
            let compiled = session
                .compiled()
                .find(&package_class)
                .and_then(|class| compiled_package(&class));

            let fragment = session.alloc_fragment(fq_name)?;
            cache.record_proper_package(fq_name);
            let scope = match compiled {
                Some((names, record)) => {
                    debug!(package = %fq_name, members = record.members.len(), "compiled package");
                    Scope::compiled_module(
                        fragment,
                        fq_name.clone(),
                        names.to_name_table(),
                        record.members,
                    )
                }
                None => {
                    debug!(package = %fq_name, "platform package");
                    cache.record_package(PlatformEntity::Package(fq_name.clone()), fragment);
                    Scope::platform_package(fragment, package)
                }
            };
            return Ok(Some(Arc::new(PackageFragment::new(fragment, fq_name.clone(), scope))));
        }

        if let Some(class) = session.platform().find_class(fq_name) {
            if should_create_static_members_package(&class) {
                let fragment = session.alloc_fragment(fq_name)?;
                cache.record_class_static_members_namespace(fq_name);
                cache.record_package(PlatformEntity::Class(fq_name.clone()), fragment);
                debug!(class = %fq_name, "static members namespace");
                let scope = Scope::static_members(fragment, class);
                return Ok(Some(Arc::new(PackageFragment::new(fragment, fq_name.clone(), scope))));
            }
        }

        debug!(name = %fq_name, "no package");
        Ok(None)
    }
}

/// Package metadata carried by a compiled package class, or `None` if the
/// bytes are not usable as such.
fn compiled_package(class: &CompiledClass) -> Option<(NameTableRecord, PackageRecord)> {
    match descry_metadata::decode(&class.bytes) {
        Ok(envelope) => match envelope.payload {
            Payload::Package(record) => Some((envelope.names, record)),
            Payload::Class(_) => {
                warn!(class = %class.fq_name, "package class carries class metadata, using platform structure");
                None
            }
        },
        Err(err) => {
            warn!(class = %class.fq_name, error = %err, "invalid compiled metadata, using platform structure");
            None
        }
    }
}
