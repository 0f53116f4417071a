// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Semantic model shared by the metadata decoders and the resolver.
//!
//! Declarations live in a session-owned [`DeclArena`] and are addressed by
//! [`DeclId`]. A declaration is created as a shell (identity, name, header)
//! and frozen exactly once with its [`Attributes`].

pub mod arena;
pub mod builtins;
pub mod decl;
pub mod error;
pub mod name;
pub mod name_table;
pub mod storage;
pub mod types;

pub use arena::DeclArena;
pub use builtins::{Builtins, BUILTINS_PACKAGE};
pub use decl::{
    Annotation, Attributes, CallableKind, ClassAttributes, ClassHeader, ClassKind, DeclId,
    DeclKind, Declaration, FunctionAttributes, Modality, Origin, PropertyAttributes,
    TypeParameterAttributes, ValueParameterAttributes, Variance, Visibility,
};
pub use error::{DescriptorError, NameError};
pub use name::{FqName, Name};
pub use name_table::{NameTable, QualifiedNameEntry};
pub use storage::{MemoizedCache, StorageError};
pub use types::{Type, TypeProjection};
