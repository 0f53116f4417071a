// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Reflected platform members to declarations.

use std::collections::HashMap;

use descry_model::{
    Attributes, CallableKind, DeclId, DeclKind, FqName, FunctionAttributes, Modality, Name,
    Origin, PropertyAttributes, Type, TypeParameterAttributes, TypeProjection,
    ValueParameterAttributes, Variance,
};
use descry_platform::{PlatformField, PlatformMethod, PlatformType, PlatformTypeParameter};
use tracing::{debug, trace};

use crate::error::ResolveError;
use crate::facade::SearchRule;
use crate::session::ResolutionSession;

/// Platform type variables declared by the signature being mapped.
#[derive(Default)]
pub(crate) struct TypeVariables {
    variables: HashMap<Name, DeclId>,
}

impl TypeVariables {
    pub(crate) fn root() -> Self {
        Self::default()
    }

    /// Bind `name` to a parameter declared elsewhere; a later binding of
    /// the same name shadows it.
    pub(crate) fn declare(&mut self, name: Name, decl: DeclId) {
        self.variables.insert(name, decl);
    }

    fn get(&self, name: &Name) -> Option<DeclId> {
        self.variables.get(name).copied()
    }
}

/// Declare reflected type parameters under `owner`: shells first, bounds
/// second, so bounds may refer to any parameter of the list.
pub(crate) fn reflect_type_parameters(
    session: &ResolutionSession,
    owner: DeclId,
    parameters: &[PlatformTypeParameter],
    variables: &mut TypeVariables,
    member: &str,
) -> Result<Vec<DeclId>, ResolveError> {
    let mut shells = Vec::with_capacity(parameters.len());
    for (index, parameter) in parameters.iter().enumerate() {
        let shell = session.arena().alloc(
            Some(owner),
            parameter.name.clone(),
            Origin::Reflected,
            DeclKind::TypeParameter {
                index,
                variance: Variance::Invariant,
                reified: false,
            },
        );
        trace!(name = %parameter.name, id = %shell.id(), member, "registered type variable");
        variables.variables.insert(parameter.name.clone(), shell.id());
        shells.push(shell);
    }

    for (shell, parameter) in shells.iter().zip(parameters) {
        let upper_bounds = if parameter.bounds.is_empty() {
            vec![session.builtins().default_bound()]
        } else {
            parameter
                .bounds
                .iter()
                .map(|bound| map_type(session, variables, bound, member))
                .collect::<Result<Vec<_>, _>>()?
        };
        shell.initialize(Attributes::TypeParameter(TypeParameterAttributes { upper_bounds }))?;
    }
    Ok(shells.iter().map(|shell| shell.id()).collect())
}

/// A static method as a function of the namespace fragment `owner`.
pub(crate) fn reflect_function(
    session: &ResolutionSession,
    owner: DeclId,
    method: &PlatformMethod,
) -> Result<DeclId, ResolveError> {
    let function = session.arena().alloc(
        Some(owner),
        method.name.clone(),
        Origin::Reflected,
        DeclKind::Function,
    );
    let member = method.name.to_string();
    let mut variables = TypeVariables::root();
    let type_parameters = reflect_type_parameters(
        session,
        function.id(),
        &method.type_parameters,
        &mut variables,
        &member,
    )?;

    let last = method.value_parameters.len().checked_sub(1);
    let mut value_parameters = Vec::with_capacity(method.value_parameters.len());
    for (index, parameter) in method.value_parameters.iter().enumerate() {
        let (ty, vararg_element_type) = if method.is_vararg && Some(index) == last {
            let element = match &parameter.ty {
                PlatformType::Array(element) => element.as_ref(),
                other => other,
            };
            let element = map_type(session, &variables, element, &member)?;
            (session.builtins().array_type(element.clone(), true), Some(element))
        } else {
            (map_type(session, &variables, &parameter.ty, &member)?, None)
        };
        let decl = session.arena().alloc(
            Some(function.id()),
            parameter.name.clone(),
            Origin::Reflected,
            DeclKind::ValueParameter,
        );
        decl.initialize(Attributes::ValueParameter(ValueParameterAttributes {
            index,
            ty,
            vararg_element_type,
            declares_default_value: false,
        }))?;
        value_parameters.push(decl.id());
    }
    let return_type = map_type(session, &variables, &method.return_type, &member)?;

    let modality = if method.is_abstract {
        Modality::Abstract
    } else if method.is_final {
        Modality::Final
    } else {
        Modality::Open
    };
    function.initialize(Attributes::Function(FunctionAttributes {
        receiver_type: None,
        type_parameters,
        value_parameters,
        return_type,
        modality,
        visibility: method.visibility,
        is_inline: false,
        annotations: Vec::new(),
        kind: CallableKind::Declaration,
    }))?;
    debug!(name = %member, id = %function.id(), "reflected function");
    Ok(function.id())
}

/// A static field as a property of the namespace fragment `owner`.
pub(crate) fn reflect_property(
    session: &ResolutionSession,
    owner: DeclId,
    field: &PlatformField,
) -> Result<DeclId, ResolveError> {
    let member = field.name.to_string();
    let ty = map_type(session, &TypeVariables::root(), &field.ty, &member)?;
    let property = session.arena().alloc(
        Some(owner),
        field.name.clone(),
        Origin::Reflected,
        DeclKind::Property,
    );
    property.initialize(Attributes::Property(PropertyAttributes {
        ty,
        is_var: !field.is_final,
        modality: Modality::Final,
        visibility: field.visibility,
    }))?;
    debug!(name = %member, id = %property.id(), "reflected property");
    Ok(property.id())
}

/// Reference types may hold null on the platform and map to nullable
/// types; primitives and `void` do not.
fn map_type(
    session: &ResolutionSession,
    variables: &TypeVariables,
    ty: &PlatformType,
    member: &str,
) -> Result<Type, ResolveError> {
    let builtins = session.builtins();
    let mapped = match ty {
        PlatformType::Primitive(kind) => builtin_type(session, kind.builtin_name()),
        PlatformType::Void => builtins.unit_type(),
        PlatformType::Class { fq_name, arguments } => {
            let arguments = arguments
                .iter()
                .map(|argument| map_argument(session, variables, argument, member))
                .collect::<Result<Vec<_>, _>>()?;
            match session.find_class(fq_name, SearchRule::IncludeSource)? {
                Some(class) => Type::Class {
                    class,
                    arguments,
                    nullable: true,
                },
                None => Type::Unresolved {
                    fq_name: fq_name.clone(),
                    arguments,
                    nullable: true,
                },
            }
        }
        PlatformType::Array(element) => {
            builtins.array_type(map_type(session, variables, element, member)?, true)
        }
        PlatformType::TypeVariable(name) => {
            let parameter = variables
                .get(name)
                .ok_or_else(|| ResolveError::UnknownTypeVariable {
                    name: name.clone(),
                    member: member.to_string(),
                })?;
            Type::Parameter {
                parameter,
                nullable: true,
            }
        }
        PlatformType::Wildcard {
            bound: Some(bound),
            is_upper: true,
        } => map_type(session, variables, bound, member)?,
        PlatformType::Wildcard { .. } => builtins.default_bound().with_nullability(true),
    };
    Ok(mapped)
}

fn map_argument(
    session: &ResolutionSession,
    variables: &TypeVariables,
    argument: &PlatformType,
    member: &str,
) -> Result<TypeProjection, ResolveError> {
    let projection = match argument {
        PlatformType::Wildcard {
            bound: Some(bound),
            is_upper,
        } => TypeProjection {
            variance: if *is_upper { Variance::Out } else { Variance::In },
            ty: map_type(session, variables, bound, member)?,
        },
        PlatformType::Wildcard { bound: None, .. } => TypeProjection {
            variance: Variance::Out,
            ty: session.builtins().default_bound().with_nullability(true),
        },
        other => TypeProjection::invariant(map_type(session, variables, other, member)?),
    };
    Ok(projection)
}

fn builtin_type(session: &ResolutionSession, name: &str) -> Type {
    match session.builtins().class_named(name) {
        Some(class) => Type::simple(class),
        None => Type::Unresolved {
            fq_name: FqName::parse(descry_model::BUILTINS_PACKAGE).child(Name::identifier(name)),
            arguments: Vec::new(),
            nullable: false,
        },
    }
}
