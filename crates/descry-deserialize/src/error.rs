// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Decoding errors. All of them mean the metadata is malformed or the
//! decoder was misused; none is recoverable by defaulting.

use descry_model::{DescriptorError, NameError, StorageError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("type parameter id {id} is referenced but was never declared")]
    UnknownTypeParameter { id: u32 },

    #[error("type parameter id {id} is declared twice in one list")]
    DuplicateTypeParameter { id: u32 },

    #[error("type parameter id {id} is used with type arguments")]
    ArgumentsOnTypeParameter { id: u32 },

    #[error(transparent)]
    Name(#[from] NameError),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
