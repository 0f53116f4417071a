// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Host-platform class structure as seen by the resolver.
//!
//! The platform has packages and classes only; it has no free-standing
//! functions. This crate models the reflected structure, the finder
//! interfaces the resolver consumes, and the structural predicates the
//! resolver needs (SAM interfaces, enum members that belong to the class
//! object, compiled-class markers).

mod finder;
mod memory;
mod naming;
mod predicates;
mod structure;

pub use finder::{CompiledClass, CompiledClassFinder, PlatformClassFinder};
pub use memory::InMemoryPlatform;
pub use naming::{
    is_compiled_class, is_compiled_class_or_package_class, package_class_fq_name,
    DEFAULT_PACKAGE_CLASS_NAME,
};
pub use predicates::{field_belongs_to_class_object, is_sam_interface, method_belongs_to_class_object};
pub use structure::{
    MetadataKind, PlatformClass, PlatformField, PlatformMethod, PlatformPackage, PlatformType,
    PlatformTypeParameter, PlatformValueParameter, PrimitiveKind,
};
