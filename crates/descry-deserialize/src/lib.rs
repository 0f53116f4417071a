// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Rebuilds declarations from compiled-module metadata records.
//!
//! A [`DeclarationDecoder`] owns a [`TypeDecoder`]; decoders nest so that a
//! function's own type parameters are visible to its signature and to
//! nothing outside it, while the enclosing declaration's parameters stay
//! visible from inside.

mod decl_decoder;
mod error;
mod type_decoder;

pub use decl_decoder::DeclarationDecoder;
pub use error::DecodeError;
pub use type_decoder::{ClassLookup, TypeDecoder};
