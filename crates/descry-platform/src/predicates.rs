// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Structural predicates over platform classes.

use crate::structure::{PlatformClass, PlatformField, PlatformMethod, PlatformType};
use descry_model::ClassKind;

/// Methods every platform object has; they never make an interface
/// non-SAM.
const UNIVERSAL_OBJECT_METHODS: &[&str] = &["equals", "hashCode", "toString"];

/// An interface with exactly one abstract instance method.
pub fn is_sam_interface(class: &PlatformClass) -> bool {
    if class.kind != ClassKind::Interface {
        return false;
    }
    let abstract_methods = class
        .methods
        .iter()
        .filter(|m| m.is_abstract && !m.is_static)
        .filter(|m| !UNIVERSAL_OBJECT_METHODS.contains(&m.name.as_str()))
        .count();
    abstract_methods == 1
}

/// Enum `values()` and `valueOf(String)` are exposed on the class object,
/// not as free-standing statics.
pub fn method_belongs_to_class_object(class: &PlatformClass, method: &PlatformMethod) -> bool {
    if class.kind != ClassKind::Enum || !method.is_static {
        return false;
    }
    match method.name.as_str() {
        "values" => method.value_parameters.is_empty(),
        "valueOf" => match method.value_parameters.as_slice() {
            [only] => is_string_type(&only.ty),
            _ => false,
        },
        _ => false,
    }
}

/// Enum entries live on the class object.
pub fn field_belongs_to_class_object(class: &PlatformClass, field: &PlatformField) -> bool {
    class.kind == ClassKind::Enum && field.is_enum_entry
}

fn is_string_type(ty: &PlatformType) -> bool {
    match ty {
        PlatformType::Class { fq_name, .. } => {
            fq_name.short_name().map(|n| n.as_str()) == Some("String")
        }
        _ => false,
    }
}
