// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Serialized record shapes.
//!
//! All names are `u32` indices: simple names into `NameTableRecord::simple`,
//! class references into `NameTableRecord::qualified`.

use descry_model::{Name, NameTable, QualifiedNameEntry};
use serde::{Deserialize, Serialize};

/// A decoded metadata file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MetadataEnvelope {
    pub names: NameTableRecord,
    pub payload: Payload,
}

impl MetadataEnvelope {
    pub fn package(&self) -> Option<&PackageRecord> {
        match &self.payload {
            Payload::Package(record) => Some(record),
            Payload::Class(_) => None,
        }
    }

    pub fn class(&self) -> Option<&ClassRecord> {
        match &self.payload {
            Payload::Class(record) => Some(record),
            Payload::Package(_) => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct NameTableRecord {
    pub simple: Vec<String>,
    pub qualified: Vec<QualifiedNameRecord>,
}

impl NameTableRecord {
    pub fn to_name_table(&self) -> NameTable {
        NameTable::new(
            self.simple.iter().map(|s| Name::identifier(s)).collect(),
            self.qualified
                .iter()
                .map(|q| QualifiedNameEntry {
                    parent: q.parent,
                    short_name: q.short_name,
                })
                .collect(),
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QualifiedNameRecord {
    pub parent: Option<u32>,
    pub short_name: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Top-level members of a package, stored on its package-object class.
    Package(PackageRecord),
    /// Header of a class compiled by this compiler.
    Class(ClassRecord),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageRecord {
    pub members: Vec<CallableRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKindRecord {
    Class,
    Interface,
    Enum,
    Annotation,
    Object,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClassRecord {
    pub fq_name: u32,
    pub kind: ClassKindRecord,
    pub type_parameters: Vec<TypeParameterRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CallableRecord {
    pub name: u32,
    pub receiver_type: Option<TypeRecord>,
    pub type_parameters: Vec<TypeParameterRecord>,
    pub value_parameters: Vec<ValueParameterRecord>,
    pub return_type: TypeRecord,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarianceRecord {
    In,
    Out,
    Inv,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TypeParameterRecord {
    /// Identifier used by type records that refer to this parameter.
    pub id: u32,
    pub name: u32,
    pub variance: VarianceRecord,
    pub reified: bool,
    pub upper_bounds: Vec<TypeRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ValueParameterRecord {
    pub name: u32,
    pub ty: TypeRecord,
    pub vararg_element_type: Option<TypeRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeConstructorRecord {
    /// Qualified-name id of a class.
    Class(u32),
    /// Id of a type parameter declared by an enclosing record.
    TypeParameter(u32),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TypeRecord {
    pub constructor: TypeConstructorRecord,
    pub arguments: Vec<TypeArgumentRecord>,
    pub nullable: bool,
}

impl TypeRecord {
    pub fn class(fq_name: u32, arguments: Vec<TypeArgumentRecord>, nullable: bool) -> Self {
        TypeRecord {
            constructor: TypeConstructorRecord::Class(fq_name),
            arguments,
            nullable,
        }
    }

    pub fn parameter(id: u32) -> Self {
        TypeRecord {
            constructor: TypeConstructorRecord::TypeParameter(id),
            arguments: Vec::new(),
            nullable: false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionRecord {
    In,
    Out,
    Inv,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TypeArgumentRecord {
    pub projection: ProjectionRecord,
    pub ty: TypeRecord,
}

impl TypeArgumentRecord {
    pub fn invariant(ty: TypeRecord) -> Self {
        TypeArgumentRecord {
            projection: ProjectionRecord::Inv,
            ty,
        }
    }
}
