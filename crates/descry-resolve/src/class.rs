// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Platform classes as declarations.
//!
//! A class shell is created when the class is first named. Its type
//! parameters are built on first access, so a bound that mentions the
//! class itself only needs the shell.

use std::collections::BTreeMap;

use descry_deserialize::DeclarationDecoder;
use descry_metadata::{ClassRecord, NameTableRecord, Payload};
use descry_model::{
    Attributes, ClassAttributes, ClassHeader, ClassKind, DeclId, DeclKind, Declaration,
    DescriptorError, FqName, Modality, Name, Origin,
};
use descry_platform::{is_compiled_class, MetadataKind, PlatformClass};
use tracing::{debug, warn};

use crate::error::ResolveError;
use crate::facade::SearchRule;
use crate::members::{self, TypeVariables};
use crate::session::ResolutionSession;

impl ResolutionSession {
    /// The shell for platform class `fq_name`, created once.
    pub(crate) fn platform_class(&self, fq_name: &FqName) -> Result<Option<DeclId>, ResolveError> {
        self.classes
            .get_or_compute(fq_name, || self.create_class_shell(fq_name))
    }

    /// A class listed as a member of a package or namespace. Package
    /// classes of compiled packages are storage, not members.
    pub(crate) fn package_member_class(
        &self,
        fq_name: &FqName,
    ) -> Result<Option<DeclId>, ResolveError> {
        match self.platform().find_class(fq_name) {
            Some(class) if class.compiled_metadata == Some(MetadataKind::Package) => Ok(None),
            _ => self.find_class(fq_name, SearchRule::IncludeSource),
        }
    }

    /// Type parameters of a class, building them on first access.
    pub fn class_type_parameters(&self, class: DeclId) -> Result<Vec<DeclId>, ResolveError> {
        let decl = self.declaration(class)?;
        if decl.is_initialized() {
            return Ok(decl.as_class()?.type_parameters.clone());
        }
        self.class_type_parameters
            .get_or_compute_value(&class, || self.initialize_class(&decl))
    }

    fn create_class_shell(&self, fq_name: &FqName) -> Result<Option<DeclId>, ResolveError> {
        let Some(class) = self.platform().find_class(fq_name) else {
            return Ok(None);
        };
        let outer = match &class.outer {
            Some(outer) => self.platform_class(outer)?,
            None => None,
        };
        let containing = match outer {
            Some(outer) => outer,
            None => self
                .merger()
                .resolve(self, &class.package)?
                .map(|fragment| fragment.decl())
                .unwrap_or_else(|| self.module()),
        };
        let decl = self.arena().alloc(
            Some(containing),
            class.name(),
            Origin::Reflected,
            DeclKind::Class(class_header(&class)),
        );
        debug!(class = %fq_name, id = %decl.id(), "created class shell");
        Ok(Some(decl.id()))
    }

    fn initialize_class(&self, decl: &Declaration) -> Result<Vec<DeclId>, ResolveError> {
        let header = decl.class_header().ok_or_else(|| DescriptorError::KindMismatch {
            id: decl.id(),
            name: decl.name().to_string(),
            expected: "class",
        })?;
        let class = self
            .platform()
            .find_class(&header.fq_name)
            .ok_or_else(|| DescriptorError::NotInitialized {
                id: decl.id(),
                name: decl.name().to_string(),
            })?;

        let enclosing = self.enclosing_type_parameters(decl)?;
        let type_parameters = match self.compiled_class_record(&class) {
            Some((names, record)) => {
                let names = names.to_name_table();
                let mut outer =
                    DeclarationDecoder::new(self.arena(), self.builtins(), &names, self, decl.id());
                let visible: BTreeMap<u32, DeclId> = enclosing
                    .iter()
                    .filter_map(|parameter| Some((parameter.metadata_id?, parameter.decl)))
                    .collect();
                for (id, parameter) in visible {
                    outer.register_type_parameter(id, parameter)?;
                }
                let mut decoder = outer.child(decl.id());
                decoder.type_parameters(&record.type_parameters)?
            }
            None => {
                let mut variables = TypeVariables::root();
                for parameter in &enclosing {
                    variables.declare(parameter.name.clone(), parameter.decl);
                }
                members::reflect_type_parameters(
                    self,
                    decl.id(),
                    &class.type_parameters,
                    &mut variables,
                    &header.fq_name.to_string(),
                )?
            }
        };

        decl.initialize(Attributes::Class(ClassAttributes {
            type_parameters: type_parameters.clone(),
        }))?;
        debug!(class = %header.fq_name, count = type_parameters.len(), "built class type parameters");
        Ok(type_parameters)
    }

    /// Type parameters of the classes an inner class can see, outermost
    /// first. Empty unless `decl` is inner; the walk stops at the first
    /// enclosing class that is not inner itself.
    fn enclosing_type_parameters(
        &self,
        decl: &Declaration,
    ) -> Result<Vec<EnclosingParameter>, ResolveError> {
        let mut levels = Vec::new();
        let mut inner = decl.class_header().is_some_and(|header| header.is_inner);
        let mut containing = decl.containing();
        while let (true, Some(outer)) = (inner, containing) {
            let outer_decl = self.declaration(outer)?;
            let Some(header) = outer_decl.class_header() else {
                break;
            };
            let ids: Vec<u32> = self
                .platform()
                .find_class(&header.fq_name)
                .and_then(|class| self.compiled_class_record(&class))
                .map(|(_, record)| record.type_parameters.iter().map(|parameter| parameter.id).collect())
                .unwrap_or_default();
            let mut level = Vec::new();
            for (index, parameter) in self.class_type_parameters(outer)?.into_iter().enumerate() {
                level.push(EnclosingParameter {
                    name: self.declaration(parameter)?.name().clone(),
                    metadata_id: ids.get(index).copied(),
                    decl: parameter,
                });
            }
            levels.push(level);
            inner = header.is_inner;
            containing = outer_decl.containing();
        }
        levels.reverse();
        Ok(levels.into_iter().flatten().collect())
    }

    /// Class metadata for classes this compiler produced, if readable.
    fn compiled_class_record(&self, class: &PlatformClass) -> Option<(NameTableRecord, ClassRecord)> {
        if !is_compiled_class(class) {
            return None;
        }
        let compiled = self.compiled().find(&class.fq_name)?;
        match descry_metadata::decode(&compiled.bytes) {
            Ok(envelope) => match envelope.payload {
                Payload::Class(record) => Some((envelope.names, record)),
                Payload::Package(_) => {
                    warn!(class = %class.fq_name, "class carries package metadata, using platform structure");
                    None
                }
            },
            Err(err) => {
                warn!(class = %class.fq_name, error = %err, "invalid compiled metadata, using platform structure");
                None
            }
        }
    }
}

/// A type parameter of an enclosing class, by name for reflected members
/// and by metadata id for compiled ones.
struct EnclosingParameter {
    name: Name,
    metadata_id: Option<u32>,
    decl: DeclId,
}

fn class_header(class: &PlatformClass) -> ClassHeader {
    let modality = if class.kind == ClassKind::Annotation {
        Modality::Final
    } else if class.is_abstract || class.kind == ClassKind::Interface {
        Modality::Abstract
    } else if class.is_final {
        Modality::Final
    } else {
        Modality::Open
    };
    let implicitly_static = matches!(
        class.kind,
        ClassKind::Interface | ClassKind::Enum | ClassKind::Annotation
    );
    ClassHeader {
        fq_name: class.fq_name.clone(),
        kind: class.kind,
        modality,
        visibility: class.visibility,
        is_inner: class.outer.is_some() && !class.is_static && !implicitly_static,
    }
}
