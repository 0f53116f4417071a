// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Shared helpers: session construction and a small metadata writer.

#![allow(dead_code)]

use std::sync::Arc;

use descry_metadata::{
    CallableRecord, ClassKindRecord, ClassRecord, MetadataEnvelope, NameTableBuilder,
    PackageRecord, Payload, TypeArgumentRecord, TypeParameterRecord, TypeRecord,
    ValueParameterRecord, VarianceRecord,
};
use descry_model::{DeclId, FqName, Name};
use descry_platform::InMemoryPlatform;
use descry_resolve::{
    render, ResolutionSession, SearchRule, SessionConfig, SourceClassRegistry, Strategy,
};

pub fn fq(text: &str) -> FqName {
    FqName::parse(text)
}

pub fn name(text: &str) -> Name {
    Name::identifier(text)
}

pub fn session(platform: InMemoryPlatform) -> ResolutionSession {
    session_with(Arc::new(platform), Strategy::Lazy, Arc::new(SourceClassRegistry::new()))
}

pub fn eager_session(platform: InMemoryPlatform) -> ResolutionSession {
    session_with(Arc::new(platform), Strategy::Eager, Arc::new(SourceClassRegistry::new()))
}

pub fn session_with(
    platform: Arc<InMemoryPlatform>,
    strategy: Strategy,
    source: Arc<SourceClassRegistry>,
) -> ResolutionSession {
    let config = SessionConfig {
        strategy,
        ..SessionConfig::default()
    };
    ResolutionSession::new(config, platform.clone(), platform, source).unwrap()
}

pub fn class(session: &ResolutionSession, text: &str) -> DeclId {
    session
        .resolve_class(&fq(text), SearchRule::IncludeSource)
        .unwrap()
        .unwrap_or_else(|| panic!("class {} not found", text))
}

/// The single function named `function` in package `package`.
pub fn function(session: &ResolutionSession, package: &str, function: &str) -> DeclId {
    let fragment = session
        .resolve_package(&fq(package), SearchRule::IncludeSource)
        .unwrap()
        .unwrap_or_else(|| panic!("package {} not found", package));
    let functions = fragment.scope().functions(session, &name(function)).unwrap();
    assert_eq!(functions.len(), 1, "expected one `{}` in {}", function, package);
    functions[0]
}

pub fn rendered(session: &ResolutionSession, id: DeclId) -> String {
    render::declaration(session, id).unwrap()
}

/// Builds metadata records against one name table.
#[derive(Default)]
pub struct MetadataWriter {
    names: NameTableBuilder,
}

impl MetadataWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(&mut self, fq_name: &str, nullable: bool) -> TypeRecord {
        self.generic(fq_name, Vec::new(), nullable)
    }

    pub fn generic(&mut self, fq_name: &str, arguments: Vec<TypeRecord>, nullable: bool) -> TypeRecord {
        let id = self.names.qualified(&fq(fq_name)).unwrap();
        TypeRecord::class(
            id,
            arguments.into_iter().map(TypeArgumentRecord::invariant).collect(),
            nullable,
        )
    }

    pub fn type_param(&mut self, id: u32, name: &str, upper_bounds: Vec<TypeRecord>) -> TypeParameterRecord {
        TypeParameterRecord {
            id,
            name: self.names.simple(name),
            variance: VarianceRecord::Inv,
            reified: false,
            upper_bounds,
        }
    }

    pub fn value(&mut self, name: &str, ty: TypeRecord) -> ValueParameterRecord {
        ValueParameterRecord {
            name: self.names.simple(name),
            ty,
            vararg_element_type: None,
        }
    }

    pub fn vararg(&mut self, name: &str, element: TypeRecord) -> ValueParameterRecord {
        let ty = self.generic("lang.Array", vec![element.clone()], false);
        ValueParameterRecord {
            name: self.names.simple(name),
            ty,
            vararg_element_type: Some(element),
        }
    }

    pub fn function(
        &mut self,
        name: &str,
        type_parameters: Vec<TypeParameterRecord>,
        value_parameters: Vec<ValueParameterRecord>,
        return_type: TypeRecord,
    ) -> CallableRecord {
        CallableRecord {
            name: self.names.simple(name),
            receiver_type: None,
            type_parameters,
            value_parameters,
            return_type,
        }
    }

    pub fn package(self, members: Vec<CallableRecord>) -> Vec<u8> {
        let envelope = MetadataEnvelope {
            names: self.names.finish(),
            payload: Payload::Package(PackageRecord { members }),
        };
        descry_metadata::encode(&envelope).unwrap()
    }

    pub fn class_metadata(
        mut self,
        fq_name: &str,
        kind: ClassKindRecord,
        type_parameters: Vec<TypeParameterRecord>,
    ) -> Vec<u8> {
        let fq_name = self.names.qualified(&fq(fq_name)).unwrap();
        let envelope = MetadataEnvelope {
            names: self.names.finish(),
            payload: Payload::Class(ClassRecord {
                fq_name,
                kind,
                type_parameters,
            }),
        };
        descry_metadata::encode(&envelope).unwrap()
    }
}
