// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Model error types.

use thiserror::Error;

use crate::decl::DeclId;

/// Misuse of the two-phase declaration protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("declaration {id} (`{name}`) is already initialized")]
    AlreadyInitialized { id: DeclId, name: String },

    #[error("declaration {id} (`{name}`) is still a shell")]
    NotInitialized { id: DeclId, name: String },

    #[error("declaration {id} (`{name}`) is not a {expected}")]
    KindMismatch {
        id: DeclId,
        name: String,
        expected: &'static str,
    },

    #[error("unknown declaration {0}")]
    UnknownDeclaration(DeclId),
}

/// A name-table lookup that points outside the table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("simple name id {id} is out of range (table has {len} entries)")]
    SimpleNameOutOfRange { id: u32, len: usize },

    #[error("qualified name id {id} is out of range (table has {len} entries)")]
    QualifiedNameOutOfRange { id: u32, len: usize },

    #[error("qualified name id {id} has a parent chain that loops")]
    CyclicQualifiedName { id: u32 },
}
