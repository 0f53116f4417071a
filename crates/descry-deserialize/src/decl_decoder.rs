// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Callable and type-parameter records to declarations.

use descry_metadata::{CallableRecord, TypeParameterRecord, ValueParameterRecord, VarianceRecord};
use descry_model::{
    Attributes, Builtins, CallableKind, DeclArena, DeclId, DeclKind, FunctionAttributes,
    Modality, NameTable, Origin, TypeParameterAttributes, ValueParameterAttributes, Variance,
    Visibility,
};
use tracing::debug;

use crate::error::DecodeError;
use crate::type_decoder::{ClassLookup, TypeDecoder};

/// Builds declarations owned by `containing` from metadata records.
pub struct DeclarationDecoder<'p, L: ClassLookup + ?Sized> {
    arena: &'p DeclArena,
    builtins: &'p Builtins,
    containing: DeclId,
    types: TypeDecoder<'p, L>,
}

impl<'p, L: ClassLookup + ?Sized> DeclarationDecoder<'p, L> {
    pub fn new(
        arena: &'p DeclArena,
        builtins: &'p Builtins,
        names: &'p NameTable,
        lookup: &'p L,
        containing: DeclId,
    ) -> Self {
        Self {
            arena,
            builtins,
            containing,
            types: TypeDecoder::new(names, lookup),
        }
    }

    /// A decoder for members of `containing`, nested inside this one.
    pub fn child<'c>(&'c self, containing: DeclId) -> DeclarationDecoder<'c, L> {
        DeclarationDecoder {
            arena: self.arena,
            builtins: self.builtins,
            containing,
            types: self.types.child(),
        }
    }

    pub fn types(&self) -> &TypeDecoder<'p, L> {
        &self.types
    }

    pub fn containing(&self) -> DeclId {
        self.containing
    }

    /// Make a parameter declared outside these records, such as one of an
    /// enclosing class, visible to types decoded here.
    pub fn register_type_parameter(&mut self, id: u32, decl: DeclId) -> Result<(), DecodeError> {
        self.types.register_type_parameter(id, decl)
    }

    /// Rebuild one top-level function.
    ///
    /// The function's type parameters are registered before its receiver is
    /// decoded, so a receiver such as `T.f()` sees the function's own `T`.
    /// Modality, visibility, inline and default-value flags are not stored
    /// in the metadata and take fixed placeholder values.
    pub fn load_function(&self, record: &CallableRecord) -> Result<DeclId, L::Error> {
        let name = self.types.name(record.name)?;
        let function = self.arena.alloc(
            Some(self.containing),
            name,
            Origin::Deserialized,
            DeclKind::Function,
        );
        let mut local = self.child(function.id());
        let type_parameters = local.type_parameters(&record.type_parameters)?;
        let receiver_type = local.types.decode_optional(record.receiver_type.as_ref())?;
        let value_parameters = local.value_parameters(&record.value_parameters)?;
        let return_type = local.types.decode(&record.return_type)?;

        function
            .initialize(Attributes::Function(FunctionAttributes {
                receiver_type,
                type_parameters,
                value_parameters,
                return_type,
                modality: Modality::Open,
                visibility: Visibility::Public,
                is_inline: false,
                annotations: Vec::new(),
                kind: CallableKind::Declaration,
            }))
            .map_err(DecodeError::from)?;
        debug!(name = %function.name(), id = %function.id(), "decoded function");
        Ok(function.id())
    }

    /// Declare a type-parameter list in this context.
    ///
    /// Every parameter is allocated and registered first; bounds are decoded
    /// afterwards, so a bound may mention itself or any later sibling. A
    /// parameter without bounds gets the default upper bound.
    pub fn type_parameters(
        &mut self,
        records: &[TypeParameterRecord],
    ) -> Result<Vec<DeclId>, L::Error> {
        let mut shells = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let shell = self.arena.alloc(
                Some(self.containing),
                self.types.name(record.name)?,
                Origin::Deserialized,
                DeclKind::TypeParameter {
                    index,
                    variance: variance(record.variance),
                    reified: record.reified,
                },
            );
            self.types.register_type_parameter(record.id, shell.id())?;
            shells.push(shell);
        }

        for (shell, record) in shells.iter().zip(records) {
            let upper_bounds = if record.upper_bounds.is_empty() {
                vec![self.builtins.default_bound()]
            } else {
                record
                    .upper_bounds
                    .iter()
                    .map(|bound| self.types.decode(bound))
                    .collect::<Result<Vec<_>, _>>()?
            };
            shell
                .initialize(Attributes::TypeParameter(TypeParameterAttributes {
                    upper_bounds,
                }))
                .map_err(DecodeError::from)?;
        }

        Ok(shells.iter().map(|shell| shell.id()).collect())
    }

    fn value_parameters(&self, records: &[ValueParameterRecord]) -> Result<Vec<DeclId>, L::Error> {
        let mut parameters = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let ty = self.types.decode(&record.ty)?;
            let vararg_element_type = self
                .types
                .decode_optional(record.vararg_element_type.as_ref())?;
            let parameter = self.arena.alloc(
                Some(self.containing),
                self.types.name(record.name)?,
                Origin::Deserialized,
                DeclKind::ValueParameter,
            );
            parameter
                .initialize(Attributes::ValueParameter(ValueParameterAttributes {
                    index,
                    ty,
                    vararg_element_type,
                    declares_default_value: false,
                }))
                .map_err(DecodeError::from)?;
            parameters.push(parameter.id());
        }
        Ok(parameters)
    }
}

fn variance(record: VarianceRecord) -> Variance {
    match record {
        VarianceRecord::In => Variance::In,
        VarianceRecord::Out => Variance::Out,
        VarianceRecord::Inv => Variance::Invariant,
    }
}
