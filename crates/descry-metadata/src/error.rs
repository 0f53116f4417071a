// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Metadata envelope errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata does not start with the expected marker")]
    InvalidMagic,

    #[error("metadata schema version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("metadata header is truncated")]
    TruncatedHeader,

    #[error("metadata body could not be decoded: {0}")]
    Decode(#[source] postcard::Error),

    #[error("metadata could not be encoded: {0}")]
    Encode(#[source] postcard::Error),

    #[error("the root package has no qualified-name entry")]
    RootName,
}
