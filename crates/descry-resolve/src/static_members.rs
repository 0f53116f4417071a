// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Platform classes reinterpreted as namespaces.
//!
//! The platform has no free-standing functions or constants, so a class
//! that carries static members is also exposed as a package of the same
//! name holding those members.

use descry_platform::{
    field_belongs_to_class_object, is_compiled_class_or_package_class, is_sam_interface,
    method_belongs_to_class_object, PlatformClass,
};

/// True if the class, or a nested class it exposes, has a static member
/// that stays out of the class object.
pub fn has_static_members(class: &PlatformClass) -> bool {
    let methods = class
        .methods
        .iter()
        .any(|m| m.is_static && !method_belongs_to_class_object(class, m));
    if methods {
        return true;
    }

    let fields = class
        .fields
        .iter()
        .any(|f| f.is_static && !field_belongs_to_class_object(class, f));
    if fields {
        return true;
    }

    class
        .nested
        .iter()
        .any(|nested| is_sam_interface(nested) || (nested.is_static && has_static_members(nested)))
}

/// Classes compiled by this compiler already have a proper form and are
/// never turned into namespaces.
pub fn should_create_static_members_package(class: &PlatformClass) -> bool {
    !is_compiled_class_or_package_class(class) && has_static_members(class)
}
