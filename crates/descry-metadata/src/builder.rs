// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Name interning for writers of metadata.

use descry_model::FqName;
use indexmap::IndexSet;

use crate::error::MetadataError;
use crate::records::{NameTableRecord, QualifiedNameRecord};

/// Interns simple and qualified names, handing out stable indices.
#[derive(Debug, Default)]
pub struct NameTableBuilder {
    simple: IndexSet<String>,
    qualified: IndexSet<QualifiedNameRecord>,
}

impl NameTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn simple(&mut self, name: &str) -> u32 {
        self.simple.insert_full(name.to_string()).0 as u32
    }

    /// Intern every prefix of `fq_name` and return the id of the full name.
    pub fn qualified(&mut self, fq_name: &FqName) -> Result<u32, MetadataError> {
        let mut parent = None;
        for segment in fq_name.segments() {
            let short_name = self.simple(segment.as_str());
            let (index, _) = self.qualified.insert_full(QualifiedNameRecord { parent, short_name });
            parent = Some(index as u32);
        }
        parent.ok_or(MetadataError::RootName)
    }

    pub fn finish(self) -> NameTableRecord {
        NameTableRecord {
            simple: self.simple.into_iter().collect(),
            qualified: self.qualified.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_prefixes_are_interned_once() {
        let mut b = NameTableBuilder::new();
        let list = b.qualified(&FqName::parse("coll.List")).unwrap();
        let map = b.qualified(&FqName::parse("coll.Map")).unwrap();
        let again = b.qualified(&FqName::parse("coll.List")).unwrap();
        assert_eq!(list, again);
        assert_ne!(list, map);

        let table = b.finish();
        assert_eq!(table.simple, vec!["coll", "List", "Map"]);
        assert_eq!(table.qualified.len(), 3);

        let names = table.to_name_table();
        assert_eq!(names.fq_name(map).unwrap().to_string(), "coll.Map");
    }

    #[test]
    fn root_has_no_id() {
        let mut b = NameTableBuilder::new();
        assert!(matches!(b.qualified(&FqName::root()), Err(MetadataError::RootName)));
    }
}
