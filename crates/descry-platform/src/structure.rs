// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Reflected packages, classes and members.

use std::sync::Arc;

use descry_model::{ClassKind, FqName, Name, Visibility};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    /// Simple name of the built-in class this primitive maps to.
    pub fn builtin_name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Char => "Char",
            PrimitiveKind::Byte => "Byte",
            PrimitiveKind::Short => "Short",
            PrimitiveKind::Int => "Int",
            PrimitiveKind::Long => "Long",
            PrimitiveKind::Float => "Float",
            PrimitiveKind::Double => "Double",
        }
    }
}

/// A type as written in platform class structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlatformType {
    Primitive(PrimitiveKind),
    Void,
    Class {
        fq_name: FqName,
        arguments: Vec<PlatformType>,
    },
    Array(Box<PlatformType>),
    TypeVariable(Name),
    /// `?`, `? extends T` (`is_upper`) or `? super T`.
    Wildcard {
        bound: Option<Box<PlatformType>>,
        is_upper: bool,
    },
}

impl PlatformType {
    pub fn class(fq_name: &str) -> Self {
        PlatformType::Class {
            fq_name: FqName::parse(fq_name),
            arguments: Vec::new(),
        }
    }

    pub fn generic(fq_name: &str, arguments: Vec<PlatformType>) -> Self {
        PlatformType::Class {
            fq_name: FqName::parse(fq_name),
            arguments,
        }
    }

    pub fn variable(name: &str) -> Self {
        PlatformType::TypeVariable(Name::identifier(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformTypeParameter {
    pub name: Name,
    pub bounds: Vec<PlatformType>,
}

impl PlatformTypeParameter {
    pub fn new(name: &str, bounds: Vec<PlatformType>) -> Self {
        Self {
            name: Name::identifier(name),
            bounds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformValueParameter {
    pub name: Name,
    pub ty: PlatformType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformMethod {
    pub name: Name,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_final: bool,
    /// The last value parameter is variadic.
    pub is_vararg: bool,
    pub type_parameters: Vec<PlatformTypeParameter>,
    pub value_parameters: Vec<PlatformValueParameter>,
    pub return_type: PlatformType,
}

impl PlatformMethod {
    /// A public, non-static, open method returning `void`.
    pub fn new(name: &str) -> Self {
        Self {
            name: Name::identifier(name),
            visibility: Visibility::Public,
            is_static: false,
            is_abstract: false,
            is_final: false,
            is_vararg: false,
            type_parameters: Vec::new(),
            value_parameters: Vec::new(),
            return_type: PlatformType::Void,
        }
    }

    pub fn static_method(name: &str) -> Self {
        Self {
            is_static: true,
            ..Self::new(name)
        }
    }

    pub fn abstract_method(name: &str) -> Self {
        Self {
            is_abstract: true,
            ..Self::new(name)
        }
    }

    pub fn param(mut self, name: &str, ty: PlatformType) -> Self {
        self.value_parameters.push(PlatformValueParameter {
            name: Name::identifier(name),
            ty,
        });
        self
    }

    pub fn type_param(mut self, parameter: PlatformTypeParameter) -> Self {
        self.type_parameters.push(parameter);
        self
    }

    pub fn returns(mut self, ty: PlatformType) -> Self {
        self.return_type = ty;
        self
    }

    pub fn vararg(mut self) -> Self {
        self.is_vararg = true;
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformField {
    pub name: Name,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_final: bool,
    pub is_enum_entry: bool,
    pub ty: PlatformType,
}

impl PlatformField {
    pub fn new(name: &str, ty: PlatformType) -> Self {
        Self {
            name: Name::identifier(name),
            visibility: Visibility::Public,
            is_static: false,
            is_final: false,
            is_enum_entry: false,
            ty,
        }
    }

    pub fn static_field(name: &str, ty: PlatformType) -> Self {
        Self {
            is_static: true,
            ..Self::new(name, ty)
        }
    }

    pub fn enum_entry(name: &str, ty: PlatformType) -> Self {
        Self {
            is_static: true,
            is_final: true,
            is_enum_entry: true,
            ..Self::new(name, ty)
        }
    }

    pub fn final_field(mut self) -> Self {
        self.is_final = true;
        self
    }
}

/// Which kind of compiled-module metadata a binary class carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataKind {
    /// The package-object class holding a package's top-level members.
    Package,
    /// An ordinary class compiled by this compiler.
    Class,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformClass {
    pub fq_name: FqName,
    /// Package the class (or its outermost enclosing class) belongs to.
    pub package: FqName,
    /// Enclosing class for nested classes.
    pub outer: Option<FqName>,
    pub kind: ClassKind,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_final: bool,
    pub type_parameters: Vec<PlatformTypeParameter>,
    pub methods: Vec<PlatformMethod>,
    pub fields: Vec<PlatformField>,
    pub nested: Vec<Arc<PlatformClass>>,
    pub compiled_metadata: Option<MetadataKind>,
}

impl PlatformClass {
    /// A public, top-level, open class with no members.
    pub fn new(fq_name: &str, kind: ClassKind) -> Self {
        let fq_name = FqName::parse(fq_name);
        Self {
            package: fq_name.parent().unwrap_or_default(),
            fq_name,
            outer: None,
            kind,
            visibility: Visibility::Public,
            is_static: false,
            is_abstract: kind == ClassKind::Interface,
            is_final: false,
            type_parameters: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            nested: Vec::new(),
            compiled_metadata: None,
        }
    }

    /// Simple name of the class.
    pub fn name(&self) -> Name {
        self.fq_name
            .short_name()
            .cloned()
            .unwrap_or_else(|| Name::special("anonymous"))
    }

    pub fn method(mut self, method: PlatformMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn field(mut self, field: PlatformField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn type_param(mut self, parameter: PlatformTypeParameter) -> Self {
        self.type_parameters.push(parameter);
        self
    }

    /// Attach a nested class named `simple_name`. The nested class and its
    /// own nested classes are renamed under this class.
    pub fn nested_class(mut self, simple_name: &str, mut nested: PlatformClass) -> Self {
        nested.reroot(
            self.fq_name.child(Name::identifier(simple_name)),
            self.fq_name.clone(),
            self.package.clone(),
        );
        self.nested.push(Arc::new(nested));
        self
    }

    pub fn static_nested(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn final_class(mut self) -> Self {
        self.is_final = true;
        self
    }

    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn with_metadata(mut self, kind: MetadataKind) -> Self {
        self.compiled_metadata = Some(kind);
        self
    }

    fn reroot(&mut self, fq_name: FqName, outer: FqName, package: FqName) {
        for child in &mut self.nested {
            let child = Arc::make_mut(child);
            let name = child.name();
            child.reroot(fq_name.child(name), fq_name.clone(), package.clone());
        }
        self.fq_name = fq_name;
        self.outer = Some(outer);
        self.package = package;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformPackage {
    pub fq_name: FqName,
    /// Top-level classes, in declaration order.
    pub classes: Vec<FqName>,
    pub sub_packages: Vec<FqName>,
}

impl PlatformPackage {
    pub fn new(fq_name: FqName) -> Self {
        Self {
            fq_name,
            classes: Vec::new(),
            sub_packages: Vec::new(),
        }
    }
}
