// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! An in-memory platform, populated programmatically.

use std::sync::Arc;

use descry_model::{ClassKind, FqName};
use indexmap::IndexMap;
use tracing::debug;

use crate::finder::{CompiledClass, CompiledClassFinder, PlatformClassFinder};
use crate::naming::package_class_fq_name;
use crate::structure::{MetadataKind, PlatformClass, PlatformPackage};

/// Platform structure and compiled binaries held in memory.
///
/// Adding a class creates its package and every enclosing package.
#[derive(Debug)]
pub struct InMemoryPlatform {
    packages: IndexMap<FqName, Arc<PlatformPackage>>,
    classes: IndexMap<FqName, Arc<PlatformClass>>,
    compiled: IndexMap<FqName, CompiledClass>,
}

impl Default for InMemoryPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPlatform {
    pub fn new() -> Self {
        let mut packages = IndexMap::new();
        packages.insert(FqName::root(), Arc::new(PlatformPackage::new(FqName::root())));
        Self {
            packages,
            classes: IndexMap::new(),
            compiled: IndexMap::new(),
        }
    }

    /// Ensure `fq_name` and all of its parents exist as packages.
    pub fn add_package(&mut self, fq_name: FqName) -> &mut Self {
        let mut missing = Vec::new();
        let mut cursor = Some(fq_name);
        while let Some(current) = cursor {
            if self.packages.contains_key(&current) {
                break;
            }
            cursor = current.parent();
            missing.push(current);
        }
        // Outermost first, so every parent exists when its child is linked.
        for package in missing.into_iter().rev() {
            if let Some(parent) = package.parent() {
                if let Some(parent_pkg) = self.packages.get_mut(&parent) {
                    Arc::make_mut(parent_pkg).sub_packages.push(package.clone());
                }
            }
            self.packages
                .insert(package.clone(), Arc::new(PlatformPackage::new(package)));
        }
        self
    }

    /// Register a top-level class and, recursively, its nested classes.
    pub fn add_class(&mut self, class: PlatformClass) -> &mut Self {
        self.add_package(class.package.clone());
        if class.outer.is_none() {
            if let Some(pkg) = self.packages.get_mut(&class.package) {
                let pkg = Arc::make_mut(pkg);
                if !pkg.classes.contains(&class.fq_name) {
                    pkg.classes.push(class.fq_name.clone());
                }
            }
        }
        self.register(Arc::new(class));
        self
    }

    /// Register a class compiled by this compiler together with its
    /// metadata bytes.
    pub fn add_compiled_class(
        &mut self,
        class: PlatformClass,
        kind: MetadataKind,
        bytes: Vec<u8>,
    ) -> &mut Self {
        let class = class.with_metadata(kind);
        self.compiled.insert(
            class.fq_name.clone(),
            CompiledClass {
                fq_name: class.fq_name.clone(),
                bytes: Arc::from(bytes),
            },
        );
        self.add_class(class)
    }

    /// Register the package-object class `package.<marker>` holding the
    /// package's compiled top-level members.
    pub fn add_compiled_package(&mut self, package: &FqName, marker: &str, bytes: Vec<u8>) -> &mut Self {
        let fq_name = package_class_fq_name(package, marker);
        let class = PlatformClass::new(&fq_name.to_string(), ClassKind::Class).final_class();
        self.add_compiled_class(class, MetadataKind::Package, bytes)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    fn register(&mut self, class: Arc<PlatformClass>) {
        for nested in &class.nested {
            self.register(nested.clone());
        }
        debug!(class = %class.fq_name, "registered platform class");
        self.classes.insert(class.fq_name.clone(), class);
    }
}

impl PlatformClassFinder for InMemoryPlatform {
    fn find_package(&self, fq_name: &FqName) -> Option<Arc<PlatformPackage>> {
        self.packages.get(fq_name).cloned()
    }

    fn find_class(&self, fq_name: &FqName) -> Option<Arc<PlatformClass>> {
        self.classes.get(fq_name).cloned()
    }
}

impl CompiledClassFinder for InMemoryPlatform {
    fn find(&self, fq_name: &FqName) -> Option<CompiledClass> {
        self.compiled.get(fq_name).cloned()
    }
}
