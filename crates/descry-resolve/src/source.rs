// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Hook for classes the compiler has already built from source.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use descry_model::{DeclId, FqName};

/// Returns the declaration source analysis built for a class, if any.
///
/// A class found here wins over any binary form of the same name, so the
/// session never holds two declarations for one class.
pub trait SourceClassResolver: Send + Sync {
    fn resolve_class(&self, fq_name: &FqName) -> Option<DeclId>;
}

/// Identity map filled by source analysis.
#[derive(Debug, Default)]
pub struct SourceClassRegistry {
    classes: Mutex<HashMap<FqName, DeclId>>,
}

impl SourceClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `class` as the source declaration for `fq_name`. The first
    /// record for a name wins; the winning id is returned.
    pub fn record(&self, fq_name: FqName, class: DeclId) -> DeclId {
        *self
            .classes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(fq_name)
            .or_insert(class)
    }

    pub fn len(&self) -> usize {
        self.classes.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SourceClassResolver for SourceClassRegistry {
    fn resolve_class(&self, fq_name: &FqName) -> Option<DeclId> {
        self.classes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(fq_name)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_record_wins() {
        let registry = SourceClassRegistry::new();
        let fq = FqName::parse("p.A");
        assert_eq!(registry.record(fq.clone(), DeclId(4)), DeclId(4));
        assert_eq!(registry.record(fq.clone(), DeclId(9)), DeclId(4));
        assert_eq!(registry.resolve_class(&fq), Some(DeclId(4)));
        assert_eq!(registry.resolve_class(&FqName::parse("p.B")), None);
        assert_eq!(registry.len(), 1);
    }
}
