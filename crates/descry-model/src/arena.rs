// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Append-only declaration storage.

use std::sync::{Arc, PoisonError, RwLock};

use crate::decl::{DeclId, DeclKind, Declaration, Origin};
use crate::error::DescriptorError;
use crate::name::Name;

/// All declarations of one resolution session, indexed by [`DeclId`].
///
/// Declarations are never removed. The lock is held only for the push or
/// the lookup, never while a declaration is being built.
#[derive(Debug, Default)]
pub struct DeclArena {
    decls: RwLock<Vec<Arc<Declaration>>>,
}

impl DeclArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a shell declaration and return it.
    pub fn alloc(
        &self,
        containing: Option<DeclId>,
        name: Name,
        origin: Origin,
        kind: DeclKind,
    ) -> Arc<Declaration> {
        let mut decls = self.decls.write().unwrap_or_else(PoisonError::into_inner);
        let id = DeclId(decls.len() as u32);
        let decl = Arc::new(Declaration::new(id, containing, name, origin, kind));
        decls.push(decl.clone());
        decl
    }

    pub fn get(&self, id: DeclId) -> Result<Arc<Declaration>, DescriptorError> {
        let decls = self.decls.read().unwrap_or_else(PoisonError::into_inner);
        decls
            .get(id.0 as usize)
            .cloned()
            .ok_or(DescriptorError::UnknownDeclaration(id))
    }

    pub fn len(&self) -> usize {
        self.decls.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
