// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Naming conventions shared by the compiler and the resolver.

use descry_model::{FqName, Name};

use crate::structure::{MetadataKind, PlatformClass};

/// Default simple name of the class that stores a package's top-level
/// members.
pub const DEFAULT_PACKAGE_CLASS_NAME: &str = "_Package";

/// `p.q` becomes `p.q.<marker>`.
pub fn package_class_fq_name(package: &FqName, marker: &str) -> FqName {
    package.child(Name::identifier(marker))
}

/// True for classes and package-object classes this compiler produced.
pub fn is_compiled_class_or_package_class(class: &PlatformClass) -> bool {
    class.compiled_metadata.is_some()
}

/// True for ordinary classes this compiler produced.
pub fn is_compiled_class(class: &PlatformClass) -> bool {
    class.compiled_metadata == Some(MetadataKind::Class)
}

#[cfg(test)]
mod tests {
    use super::*;
    use descry_model::ClassKind;

    #[test]
    fn package_class_is_appended() {
        let fq = package_class_fq_name(&FqName::parse("p.q"), DEFAULT_PACKAGE_CLASS_NAME);
        assert_eq!(fq.to_string(), "p.q._Package");
        let root = package_class_fq_name(&FqName::root(), "PKG");
        assert_eq!(root.to_string(), "PKG");
    }

    #[test]
    fn compiled_markers() {
        let plain = PlatformClass::new("p.A", ClassKind::Class);
        let class = plain.clone().with_metadata(MetadataKind::Class);
        let facade = plain.clone().with_metadata(MetadataKind::Package);
        assert!(!is_compiled_class_or_package_class(&plain));
        assert!(is_compiled_class_or_package_class(&class));
        assert!(is_compiled_class_or_package_class(&facade));
        assert!(is_compiled_class(&class));
        assert!(!is_compiled_class(&facade));
    }
}
