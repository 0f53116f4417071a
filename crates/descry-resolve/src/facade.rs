// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Queries other compiler phases run against a session.

use std::collections::BTreeSet;
use std::sync::Arc;

use descry_model::{DeclId, DeclKind, FqName, Name, Origin};
use descry_platform::is_compiled_class;
use tracing::{debug, warn};

use crate::config::Strategy;
use crate::error::ResolveError;
use crate::scope::{PackageFragment, Scope};
use crate::session::ResolutionSession;

/// Whether classes already built from source take part in a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchRule {
    /// A class built from source wins over its binary form.
    #[default]
    IncludeSource,
    /// Only binary forms are considered. Used while a class is being
    /// compiled, so it does not resolve against itself.
    IgnoreSource,
    /// Finding the class in source is an error.
    ErrorIfFoundInSource,
}

impl ResolutionSession {
    /// Resolve a class by qualified name.
    ///
    /// Built-in classes come first, then the source hook (subject to
    /// `rule`), then platform classes. A name that is none of these is
    /// `Ok(None)`.
    pub fn resolve_class(
        &self,
        fq_name: &FqName,
        rule: SearchRule,
    ) -> Result<Option<DeclId>, ResolveError> {
        if let Some(class) = self.builtins().class(fq_name) {
            return Ok(Some(class));
        }
        if let Some(class) = self.source_class(fq_name, rule)? {
            return Ok(Some(class));
        }
        let class = self.platform_class(fq_name)?;
        if let (Some(class), Strategy::Eager) = (class, self.config.strategy) {
            // Failures stay with the class and surface again on access.
            if let Err(err) = self.class_type_parameters(class) {
                warn!(class = %fq_name, error = %err, "could not build class type parameters");
            }
        }
        Ok(class)
    }

    /// Like [`resolve_class`](Self::resolve_class), without eager
    /// materialization. Used for references found while building other
    /// declarations.
    pub(crate) fn find_class(
        &self,
        fq_name: &FqName,
        rule: SearchRule,
    ) -> Result<Option<DeclId>, ResolveError> {
        if let Some(class) = self.builtins().class(fq_name) {
            return Ok(Some(class));
        }
        if let Some(class) = self.source_class(fq_name, rule)? {
            return Ok(Some(class));
        }
        self.platform_class(fq_name)
    }

    /// Resolve a package by qualified name.
    ///
    /// Packages only come from binaries, so `rule` does not change the
    /// result; it is accepted so callers can pass one rule to both
    /// lookups.
    pub fn resolve_package(
        &self,
        fq_name: &FqName,
        rule: SearchRule,
    ) -> Result<Option<Arc<PackageFragment>>, ResolveError> {
        let fragment = self.merger().resolve(self, fq_name)?;
        if let (Some(fragment), Strategy::Eager) = (&fragment, self.config.strategy) {
            self.materialize(fragment)?;
        }
        debug!(package = %fq_name, ?rule, found = fragment.is_some(), "resolved package");
        Ok(fragment)
    }

    /// The member scope of a resolved package declaration.
    pub fn package_scope(&self, package: DeclId) -> Result<Option<Scope>, ResolveError> {
        let decl = self.declaration(package)?;
        let DeclKind::PackageFragment { fq_name } = decl.kind() else {
            return Err(ResolveError::NotAPackage { id: package });
        };
        let fragment = self.merger().resolve(self, fq_name)?;
        Ok(fragment
            .filter(|fragment| fragment.decl() == package)
            .map(|fragment| fragment.scope().clone()))
    }

    /// Qualified names of the packages directly under `fq_name`.
    pub fn sub_packages(&self, fq_name: &FqName) -> Result<BTreeSet<FqName>, ResolveError> {
        let Some(fragment) = self.merger().resolve(self, fq_name)? else {
            return Ok(BTreeSet::new());
        };
        Ok(fragment.scope().sub_packages(self).into_iter().collect())
    }

    /// Simple names of the classes in platform package `fq_name` that this
    /// compiler produced, in platform order.
    pub fn class_names_in_package(&self, fq_name: &FqName) -> Vec<Name> {
        let Some(package) = self.platform().find_package(fq_name) else {
            return Vec::new();
        };
        package
            .classes
            .iter()
            .filter_map(|class| self.platform().find_class(class))
            .filter(|class| is_compiled_class(class))
            .map(|class| class.name())
            .collect()
    }

    fn source_class(
        &self,
        fq_name: &FqName,
        rule: SearchRule,
    ) -> Result<Option<DeclId>, ResolveError> {
        if rule == SearchRule::IgnoreSource {
            return Ok(None);
        }
        match self.source.resolve_class(fq_name) {
            Some(_) if rule == SearchRule::ErrorIfFoundInSource => {
                Err(ResolveError::FoundInSource {
                    fq_name: fq_name.clone(),
                })
            }
            found => Ok(found),
        }
    }

    /// Build every member of a fragment, once per fragment.
    ///
    /// A member that fails to build is logged and skipped; looking it up
    /// later reports the same error, as it would under the lazy strategy.
    fn materialize(&self, fragment: &PackageFragment) -> Result<usize, ResolveError> {
        self.materialized
            .get_or_compute_value(fragment.fq_name(), || {
                let scope = fragment.scope();
                let names = match scope.member_names(self) {
                    Ok(names) => names,
                    Err(err) => {
                        warn!(package = %fragment.fq_name(), error = %err, "could not list package members");
                        return Ok(0);
                    }
                };
                let mut built = 0;
                for name in &names {
                    let members = match scope.member(self, name) {
                        Ok(members) => members,
                        Err(err) => {
                            warn!(package = %fragment.fq_name(), member = ?name, error = %err, "could not build member");
                            continue;
                        }
                    };
                    for member in members {
                        let decl = self.declaration(member)?;
                        if decl.origin() == Origin::Reflected && decl.class_header().is_some() {
                            if let Err(err) = self.class_type_parameters(member) {
                                warn!(class = %decl.name(), error = %err, "could not build class type parameters");
                            }
                        }
                        built += 1;
                    }
                }
                debug!(package = %fragment.fq_name(), count = built, "materialized package");
                Ok(built)
            })
    }
}
