// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Type records to live types.

use std::collections::HashMap;

use descry_metadata::{ProjectionRecord, TypeArgumentRecord, TypeConstructorRecord, TypeRecord};
use descry_model::{DeclId, FqName, Name, NameTable, Type, TypeProjection, Variance};
use tracing::trace;

use crate::error::DecodeError;

/// Finds the class a type record refers to.
///
/// Implementations only need to hand back an identity; the class may still
/// be a shell. `Ok(None)` means the class is unknown and the reference is
/// kept as [`Type::Unresolved`].
pub trait ClassLookup {
    type Error: From<DecodeError>;

    fn class_by_fq_name(&self, fq_name: &FqName) -> Result<Option<DeclId>, Self::Error>;
}

/// One resolution context: the type parameters registered at this level
/// plus a link to the enclosing context.
///
/// Lookups walk outward, so an inner context sees every parameter of its
/// ancestors but an ancestor never sees an inner parameter.
pub struct TypeDecoder<'p, L: ClassLookup + ?Sized> {
    parent: Option<&'p TypeDecoder<'p, L>>,
    names: &'p NameTable,
    lookup: &'p L,
    type_parameters: HashMap<u32, DeclId>,
}

impl<'p, L: ClassLookup + ?Sized> TypeDecoder<'p, L> {
    pub fn new(names: &'p NameTable, lookup: &'p L) -> Self {
        Self {
            parent: None,
            names,
            lookup,
            type_parameters: HashMap::new(),
        }
    }

    /// A nested context whose parent is `self`.
    pub fn child<'c>(&'c self) -> TypeDecoder<'c, L> {
        TypeDecoder {
            parent: Some(self),
            names: self.names,
            lookup: self.lookup,
            type_parameters: HashMap::new(),
        }
    }

    pub fn names(&self) -> &'p NameTable {
        self.names
    }

    pub fn lookup(&self) -> &'p L {
        self.lookup
    }

    pub fn name(&self, id: u32) -> Result<Name, DecodeError> {
        Ok(self.names.name(id)?.clone())
    }

    /// Make `id` refer to `decl` within this context.
    pub fn register_type_parameter(&mut self, id: u32, decl: DeclId) -> Result<(), DecodeError> {
        if self.type_parameters.insert(id, decl).is_some() {
            return Err(DecodeError::DuplicateTypeParameter { id });
        }
        trace!(id, %decl, "registered type parameter");
        Ok(())
    }

    /// Resolve a type-parameter id against this context and its ancestors.
    pub fn type_parameter(&self, id: u32) -> Option<DeclId> {
        let mut context = Some(self);
        while let Some(current) = context {
            if let Some(decl) = current.type_parameters.get(&id) {
                return Some(*decl);
            }
            context = current.parent;
        }
        None
    }

    pub fn decode(&self, record: &TypeRecord) -> Result<Type, L::Error> {
        match record.constructor {
            TypeConstructorRecord::TypeParameter(id) => {
                if !record.arguments.is_empty() {
                    return Err(DecodeError::ArgumentsOnTypeParameter { id }.into());
                }
                let parameter = self
                    .type_parameter(id)
                    .ok_or(DecodeError::UnknownTypeParameter { id })?;
                Ok(Type::Parameter {
                    parameter,
                    nullable: record.nullable,
                })
            }
            TypeConstructorRecord::Class(fq_id) => {
                let fq_name = self.names.fq_name(fq_id).map_err(DecodeError::from)?;
                let arguments = record
                    .arguments
                    .iter()
                    .map(|argument| self.decode_argument(argument))
                    .collect::<Result<Vec<_>, _>>()?;
                let ty = match self.lookup.class_by_fq_name(&fq_name)? {
                    Some(class) => Type::Class {
                        class,
                        arguments,
                        nullable: record.nullable,
                    },
                    None => {
                        trace!(%fq_name, "class not found, keeping unresolved reference");
                        Type::Unresolved {
                            fq_name,
                            arguments,
                            nullable: record.nullable,
                        }
                    }
                };
                Ok(ty)
            }
        }
    }

    pub fn decode_optional(&self, record: Option<&TypeRecord>) -> Result<Option<Type>, L::Error> {
        record.map(|record| self.decode(record)).transpose()
    }

    fn decode_argument(&self, argument: &TypeArgumentRecord) -> Result<TypeProjection, L::Error> {
        Ok(TypeProjection {
            variance: projection(argument.projection),
            ty: self.decode(&argument.ty)?,
        })
    }
}

pub(crate) fn projection(record: ProjectionRecord) -> Variance {
    match record {
        ProjectionRecord::In => Variance::In,
        ProjectionRecord::Out => Variance::Out,
        ProjectionRecord::Inv => Variance::Invariant,
    }
}
