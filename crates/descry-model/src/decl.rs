// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Declarations and their two-phase lifecycle.

use std::fmt;
use std::sync::OnceLock;

use crate::error::DescriptorError;
use crate::name::{FqName, Name};
use crate::types::Type;

/// Index of a declaration in its session's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub u32);

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a declaration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Built by the compiler's own source analysis.
    Source,
    /// Read back from compiled-module metadata.
    Deserialized,
    /// Built from host-platform class structure.
    Reflected,
    /// Made up by the resolver (module root, built-ins, namespaces).
    Synthesized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modality {
    Final,
    Open,
    Abstract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Internal,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Object,
}

/// Declaration-site variance of a type parameter, or use-site projection
/// of a type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variance {
    Invariant,
    In,
    Out,
}

impl Variance {
    /// Keyword prefix used when rendering (`in `, `out `, or nothing).
    pub fn label(self) -> &'static str {
        match self {
            Variance::Invariant => "",
            Variance::In => "in",
            Variance::Out => "out",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallableKind {
    Declaration,
}

/// Identity-level facts about a class, known when its shell is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHeader {
    pub fq_name: FqName,
    pub kind: ClassKind,
    pub modality: Modality,
    pub visibility: Visibility,
    pub is_inner: bool,
}

/// The shell part of a declaration: what it is, without its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    Module,
    PackageFragment { fq_name: FqName },
    Class(ClassHeader),
    Function,
    Property,
    ValueParameter,
    TypeParameter {
        index: usize,
        variance: Variance,
        reified: bool,
    },
}

impl DeclKind {
    pub fn describe(&self) -> &'static str {
        match self {
            DeclKind::Module => "module",
            DeclKind::PackageFragment { .. } => "package fragment",
            DeclKind::Class(_) => "class",
            DeclKind::Function => "function",
            DeclKind::Property => "property",
            DeclKind::ValueParameter => "value parameter",
            DeclKind::TypeParameter { .. } => "type parameter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub class: DeclId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassAttributes {
    pub type_parameters: Vec<DeclId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionAttributes {
    pub receiver_type: Option<Type>,
    pub type_parameters: Vec<DeclId>,
    pub value_parameters: Vec<DeclId>,
    pub return_type: Type,
    pub modality: Modality,
    pub visibility: Visibility,
    pub is_inline: bool,
    pub annotations: Vec<Annotation>,
    pub kind: CallableKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyAttributes {
    pub ty: Type,
    pub is_var: bool,
    pub modality: Modality,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueParameterAttributes {
    pub index: usize,
    pub ty: Type,
    /// Element type when the parameter is variadic.
    pub vararg_element_type: Option<Type>,
    pub declares_default_value: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameterAttributes {
    pub upper_bounds: Vec<Type>,
}

/// Frozen semantic attributes of an initialized declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attributes {
    Module,
    PackageFragment,
    Class(ClassAttributes),
    Function(FunctionAttributes),
    Property(PropertyAttributes),
    ValueParameter(ValueParameterAttributes),
    TypeParameter(TypeParameterAttributes),
}

impl Attributes {
    fn matches(&self, kind: &DeclKind) -> bool {
        matches!(
            (self, kind),
            (Attributes::Module, DeclKind::Module)
                | (Attributes::PackageFragment, DeclKind::PackageFragment { .. })
                | (Attributes::Class(_), DeclKind::Class(_))
                | (Attributes::Function(_), DeclKind::Function)
                | (Attributes::Property(_), DeclKind::Property)
                | (Attributes::ValueParameter(_), DeclKind::ValueParameter)
                | (Attributes::TypeParameter(_), DeclKind::TypeParameter { .. })
        )
    }
}

/// One node of the semantic model.
///
/// The header fields are fixed at allocation. `attrs` is written exactly
/// once by [`Declaration::initialize`]; until then the declaration is a
/// shell and only its identity may be used (for example as the target of
/// a type reference from a sibling's bound).
#[derive(Debug)]
pub struct Declaration {
    id: DeclId,
    containing: Option<DeclId>,
    name: Name,
    origin: Origin,
    kind: DeclKind,
    attrs: OnceLock<Attributes>,
}

impl Declaration {
    pub(crate) fn new(
        id: DeclId,
        containing: Option<DeclId>,
        name: Name,
        origin: Origin,
        kind: DeclKind,
    ) -> Self {
        Self {
            id,
            containing,
            name,
            origin,
            kind,
            attrs: OnceLock::new(),
        }
    }

    pub fn id(&self) -> DeclId {
        self.id
    }

    /// The containing declaration; `None` only for a module root.
    pub fn containing(&self) -> Option<DeclId> {
        self.containing
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn kind(&self) -> &DeclKind {
        &self.kind
    }

    pub fn class_header(&self) -> Option<&ClassHeader> {
        match &self.kind {
            DeclKind::Class(header) => Some(header),
            _ => None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.attrs.get().is_some()
    }

    /// Freeze the declaration. Fails if it was already frozen or if the
    /// attributes do not fit the declaration kind.
    pub fn initialize(&self, attrs: Attributes) -> Result<(), DescriptorError> {
        if !attrs.matches(&self.kind) {
            return Err(self.mismatch(self.kind.describe()));
        }
        self.attrs
            .set(attrs)
            .map_err(|_| DescriptorError::AlreadyInitialized {
                id: self.id,
                name: self.name.to_string(),
            })
    }

    pub fn attributes(&self) -> Result<&Attributes, DescriptorError> {
        self.attrs.get().ok_or_else(|| DescriptorError::NotInitialized {
            id: self.id,
            name: self.name.to_string(),
        })
    }

    pub fn as_class(&self) -> Result<&ClassAttributes, DescriptorError> {
        match self.attributes()? {
            Attributes::Class(attrs) => Ok(attrs),
            _ => Err(self.mismatch("class")),
        }
    }

    pub fn as_function(&self) -> Result<&FunctionAttributes, DescriptorError> {
        match self.attributes()? {
            Attributes::Function(attrs) => Ok(attrs),
            _ => Err(self.mismatch("function")),
        }
    }

    pub fn as_property(&self) -> Result<&PropertyAttributes, DescriptorError> {
        match self.attributes()? {
            Attributes::Property(attrs) => Ok(attrs),
            _ => Err(self.mismatch("property")),
        }
    }

    pub fn as_value_parameter(&self) -> Result<&ValueParameterAttributes, DescriptorError> {
        match self.attributes()? {
            Attributes::ValueParameter(attrs) => Ok(attrs),
            _ => Err(self.mismatch("value parameter")),
        }
    }

    pub fn as_type_parameter(&self) -> Result<&TypeParameterAttributes, DescriptorError> {
        match self.attributes()? {
            Attributes::TypeParameter(attrs) => Ok(attrs),
            _ => Err(self.mismatch("type parameter")),
        }
    }

    fn mismatch(&self, expected: &'static str) -> DescriptorError {
        DescriptorError::KindMismatch {
            id: self.id,
            name: self.name.to_string(),
            expected,
        }
    }
}
