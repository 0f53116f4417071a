// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Built-in classes every session starts with.

use std::collections::HashMap;

use crate::arena::DeclArena;
use crate::decl::{
    Attributes, ClassAttributes, ClassHeader, ClassKind, DeclId, DeclKind, Modality, Origin,
    TypeParameterAttributes, Variance, Visibility,
};
use crate::error::DescriptorError;
use crate::name::{FqName, Name};
use crate::types::{Type, TypeProjection};

/// Package holding the built-in classes.
pub const BUILTINS_PACKAGE: &str = "lang";

const PLAIN_CLASSES: &[&str] = &[
    "Any", "Nothing", "Unit", "Boolean", "Char", "Byte", "Short", "Int", "Long", "Float",
    "Double", "String",
];

/// The built-in classes, allocated once per session.
#[derive(Debug)]
pub struct Builtins {
    package: DeclId,
    classes: HashMap<FqName, DeclId>,
    any: DeclId,
    unit: DeclId,
    array: DeclId,
}

impl Builtins {
    /// Allocate the built-in package fragment and its classes under `module`.
    pub fn new(arena: &DeclArena, module: DeclId) -> Result<Self, DescriptorError> {
        let package_fq = FqName::parse(BUILTINS_PACKAGE);
        let package = arena.alloc(
            Some(module),
            Name::identifier(BUILTINS_PACKAGE),
            Origin::Synthesized,
            DeclKind::PackageFragment {
                fq_name: package_fq.clone(),
            },
        );
        package.initialize(Attributes::PackageFragment)?;

        let mut classes = HashMap::new();
        for name in PLAIN_CLASSES {
            let id = alloc_class(arena, package.id(), &package_fq, name, ClassKind::Class)?;
            classes.insert(package_fq.child(Name::identifier(name)), id);
        }
        let any = classes[&package_fq.child(Name::identifier("Any"))];
        let unit = classes[&package_fq.child(Name::identifier("Unit"))];

        let array = alloc_generic_class(
            arena,
            package.id(),
            &package_fq,
            "Array",
            ClassKind::Class,
            Variance::Invariant,
            any,
        )?;
        classes.insert(package_fq.child(Name::identifier("Array")), array);
        let comparable = alloc_generic_class(
            arena,
            package.id(),
            &package_fq,
            "Comparable",
            ClassKind::Interface,
            Variance::In,
            any,
        )?;
        classes.insert(package_fq.child(Name::identifier("Comparable")), comparable);

        Ok(Self {
            package: package.id(),
            classes,
            any,
            unit,
            array,
        })
    }

    pub fn package(&self) -> DeclId {
        self.package
    }

    pub fn class(&self, fq_name: &FqName) -> Option<DeclId> {
        self.classes.get(fq_name).copied()
    }

    /// A built-in class by its simple name (`Int`, `Array`, ...).
    pub fn class_named(&self, name: &str) -> Option<DeclId> {
        self.class(&FqName::parse(BUILTINS_PACKAGE).child(Name::identifier(name)))
    }

    /// The implicit upper bound of a type parameter declared without one.
    pub fn default_bound(&self) -> Type {
        Type::simple(self.any)
    }

    pub fn unit_type(&self) -> Type {
        Type::simple(self.unit)
    }

    pub fn array_type(&self, element: Type, nullable: bool) -> Type {
        Type::Class {
            class: self.array,
            arguments: vec![TypeProjection::invariant(element)],
            nullable,
        }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

fn alloc_class(
    arena: &DeclArena,
    package: DeclId,
    package_fq: &FqName,
    name: &str,
    kind: ClassKind,
) -> Result<DeclId, DescriptorError> {
    let decl = arena.alloc(
        Some(package),
        Name::identifier(name),
        Origin::Synthesized,
        DeclKind::Class(builtin_header(package_fq, name, kind)),
    );
    decl.initialize(Attributes::Class(ClassAttributes {
        type_parameters: Vec::new(),
    }))?;
    Ok(decl.id())
}

fn alloc_generic_class(
    arena: &DeclArena,
    package: DeclId,
    package_fq: &FqName,
    name: &str,
    kind: ClassKind,
    variance: Variance,
    any: DeclId,
) -> Result<DeclId, DescriptorError> {
    let class = arena.alloc(
        Some(package),
        Name::identifier(name),
        Origin::Synthesized,
        DeclKind::Class(builtin_header(package_fq, name, kind)),
    );
    let parameter = arena.alloc(
        Some(class.id()),
        Name::identifier("T"),
        Origin::Synthesized,
        DeclKind::TypeParameter {
            index: 0,
            variance,
            reified: false,
        },
    );
    parameter.initialize(Attributes::TypeParameter(TypeParameterAttributes {
        upper_bounds: vec![Type::simple(any)],
    }))?;
    class.initialize(Attributes::Class(ClassAttributes {
        type_parameters: vec![parameter.id()],
    }))?;
    Ok(class.id())
}

fn builtin_header(package_fq: &FqName, name: &str, kind: ClassKind) -> ClassHeader {
    ClassHeader {
        fq_name: package_fq.child(Name::identifier(name)),
        kind,
        modality: if kind == ClassKind::Interface {
            Modality::Abstract
        } else {
            Modality::Final
        },
        visibility: Visibility::Public,
        is_inner: false,
    }
}
