// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Compiled-module metadata: the compact binary form of declarations
//! previously compiled by this compiler.
//!
//! Records reference names by index into a per-file name table, so string
//! data is stored once. The envelope starts with a magic marker and a
//! schema version that are checked before the body is read.

mod builder;
mod error;
mod records;

pub use builder::NameTableBuilder;
pub use error::MetadataError;
pub use records::{
    CallableRecord, ClassKindRecord, ClassRecord, MetadataEnvelope, NameTableRecord,
    PackageRecord, Payload, ProjectionRecord, QualifiedNameRecord, TypeArgumentRecord,
    TypeConstructorRecord, TypeParameterRecord, TypeRecord, ValueParameterRecord,
    VarianceRecord,
};

use serde::{Deserialize, Serialize};

/// Marker at the start of every metadata blob.
pub const MAGIC: [u8; 4] = *b"DSCM";

/// Current schema version. Bump on any breaking change to the records.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct EnvelopeHeader {
    magic: [u8; 4],
    version: u32,
}

#[derive(Serialize, Deserialize)]
struct EnvelopeBody {
    names: NameTableRecord,
    payload: Payload,
}

/// Serialize an envelope to bytes.
pub fn encode(envelope: &MetadataEnvelope) -> Result<Vec<u8>, MetadataError> {
    let mut bytes = postcard::to_allocvec(&EnvelopeHeader {
        magic: MAGIC,
        version: SCHEMA_VERSION,
    })
    .map_err(MetadataError::Encode)?;
    let body = postcard::to_allocvec(&EnvelopeBody {
        names: envelope.names.clone(),
        payload: envelope.payload.clone(),
    })
    .map_err(MetadataError::Encode)?;
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

/// Deserialize an envelope, checking the marker and version first.
pub fn decode(bytes: &[u8]) -> Result<MetadataEnvelope, MetadataError> {
    let (header, rest) =
        postcard::take_from_bytes::<EnvelopeHeader>(bytes).map_err(|_| MetadataError::TruncatedHeader)?;
    if header.magic != MAGIC {
        return Err(MetadataError::InvalidMagic);
    }
    if header.version != SCHEMA_VERSION {
        return Err(MetadataError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found: header.version,
        });
    }
    let body: EnvelopeBody = postcard::from_bytes(rest).map_err(MetadataError::Decode)?;
    Ok(MetadataEnvelope {
        names: body.names,
        payload: body.payload,
    })
}
