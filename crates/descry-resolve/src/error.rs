// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Resolution errors.
//!
//! A name that does not resolve is not an error; it is `Ok(None)`.

use descry_deserialize::DecodeError;
use descry_model::{DeclId, DescriptorError, FqName, Name, StorageError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("`{fq_name}` is declared in source")]
    FoundInSource { fq_name: FqName },

    #[error("type variable `{name}` is not declared in `{member}`")]
    UnknownTypeVariable { name: Name, member: String },

    #[error("declaration {id} is not a package")]
    NotAPackage { id: DeclId },

    #[error("invalid value `{value}` for {key}")]
    InvalidConfig { key: &'static str, value: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
