// SPDX-License-Identifier: (MIT OR Apache-2.0)

use descry_metadata::MetadataError;
use descry_resolve::ResolveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid fixture {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("bad type `{text}` at {position}: {message}")]
    Type {
        text: String,
        position: usize,
        message: String,
    },

    #[error("{0}")]
    Metadata(#[from] MetadataError),

    #[error("{0}")]
    Resolve(#[from] ResolveError),

    #[error("no {what} named `{name}`")]
    NotFound { what: &'static str, name: String },

    #[error("usage: {0}")]
    Usage(String),
}
