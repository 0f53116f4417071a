// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Integer-to-name lookup used by compiled-module metadata.

use crate::error::NameError;
use crate::name::{FqName, Name};

/// One link of a qualified name: an optional parent qualified name and the
/// simple name appended to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifiedNameEntry {
    pub parent: Option<u32>,
    pub short_name: u32,
}

/// Names referenced by a metadata record, stored once and addressed by index.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    simple: Vec<Name>,
    qualified: Vec<QualifiedNameEntry>,
}

impl NameTable {
    pub fn new(simple: Vec<Name>, qualified: Vec<QualifiedNameEntry>) -> Self {
        Self { simple, qualified }
    }

    pub fn name(&self, id: u32) -> Result<&Name, NameError> {
        self.simple.get(id as usize).ok_or(NameError::SimpleNameOutOfRange {
            id,
            len: self.simple.len(),
        })
    }

    /// Rebuild the qualified name for `id` by walking its parent chain.
    pub fn fq_name(&self, id: u32) -> Result<FqName, NameError> {
        let mut segments = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            // A well-formed chain is never longer than the table itself.
            if segments.len() > self.qualified.len() {
                return Err(NameError::CyclicQualifiedName { id });
            }
            let entry = self
                .qualified
                .get(current as usize)
                .ok_or(NameError::QualifiedNameOutOfRange {
                    id: current,
                    len: self.qualified.len(),
                })?;
            segments.push(self.name(entry.short_name)?.clone());
            cursor = entry.parent;
        }
        segments.reverse();
        Ok(FqName::from_segments(segments))
    }

    pub fn simple_len(&self) -> usize {
        self.simple.len()
    }

    pub fn qualified_len(&self) -> usize {
        self.qualified.len()
    }
}
