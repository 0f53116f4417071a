// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Interfaces the resolver uses to reach platform structure and
//! compiled-module binaries.

use std::sync::Arc;

use descry_model::FqName;

use crate::structure::{PlatformClass, PlatformPackage};

/// Looks up reflected packages and classes by qualified name.
pub trait PlatformClassFinder: Send + Sync {
    fn find_package(&self, fq_name: &FqName) -> Option<Arc<PlatformPackage>>;

    /// Find a class, including nested classes by their full dotted name.
    fn find_class(&self, fq_name: &FqName) -> Option<Arc<PlatformClass>>;
}

/// A binary class carrying compiled-module metadata.
#[derive(Debug, Clone)]
pub struct CompiledClass {
    pub fq_name: FqName,
    pub bytes: Arc<[u8]>,
}

/// Looks up binary classes produced by this compiler.
pub trait CompiledClassFinder: Send + Sync {
    fn find(&self, fq_name: &FqName) -> Option<CompiledClass>;
}
