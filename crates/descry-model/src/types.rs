// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Type references between declarations.

use crate::decl::{DeclId, Variance};
use crate::name::FqName;

/// A live type value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// A class applied to type arguments.
    Class {
        class: DeclId,
        arguments: Vec<TypeProjection>,
        nullable: bool,
    },
    /// A reference to a type parameter declaration.
    Parameter { parameter: DeclId, nullable: bool },
    /// A class reference whose target could not be found. Kept so that
    /// later phases can report it against the use site.
    Unresolved {
        fq_name: FqName,
        arguments: Vec<TypeProjection>,
        nullable: bool,
    },
}

/// A type argument with its use-site projection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeProjection {
    pub variance: Variance,
    pub ty: Type,
}

impl TypeProjection {
    pub fn invariant(ty: Type) -> Self {
        TypeProjection {
            variance: Variance::Invariant,
            ty,
        }
    }
}

impl Type {
    /// A non-null class type without arguments.
    pub fn simple(class: DeclId) -> Type {
        Type::Class {
            class,
            arguments: Vec::new(),
            nullable: false,
        }
    }

    pub fn parameter(parameter: DeclId) -> Type {
        Type::Parameter {
            parameter,
            nullable: false,
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            Type::Class { nullable, .. }
            | Type::Parameter { nullable, .. }
            | Type::Unresolved { nullable, .. } => *nullable,
        }
    }

    pub fn with_nullability(self, value: bool) -> Type {
        match self {
            Type::Class { class, arguments, .. } => Type::Class {
                class,
                arguments,
                nullable: value,
            },
            Type::Parameter { parameter, .. } => Type::Parameter {
                parameter,
                nullable: value,
            },
            Type::Unresolved { fq_name, arguments, .. } => Type::Unresolved {
                fq_name,
                arguments,
                nullable: value,
            },
        }
    }

    /// The declaration this type points at, if it was resolved.
    pub fn target(&self) -> Option<DeclId> {
        match self {
            Type::Class { class, .. } => Some(*class),
            Type::Parameter { parameter, .. } => Some(*parameter),
            Type::Unresolved { .. } => None,
        }
    }

    pub fn arguments(&self) -> &[TypeProjection] {
        match self {
            Type::Class { arguments, .. } | Type::Unresolved { arguments, .. } => arguments,
            Type::Parameter { .. } => &[],
        }
    }
}
