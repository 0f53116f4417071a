// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! JSON description of a platform, lowered to an in-memory platform with
//! encoded metadata for the compiled parts.

use std::fs;
use std::path::Path;

use descry_metadata::{
    CallableRecord, ClassKindRecord, ClassRecord, MetadataEnvelope, NameTableBuilder,
    PackageRecord, Payload, ProjectionRecord, TypeArgumentRecord, TypeConstructorRecord,
    TypeParameterRecord, TypeRecord, ValueParameterRecord, VarianceRecord,
};
use descry_model::{ClassKind, FqName};
use descry_platform::{
    InMemoryPlatform, MetadataKind, PlatformClass, PlatformField, PlatformMethod, PlatformType,
    PlatformTypeParameter, PrimitiveKind,
};
use descry_resolve::SessionConfig;
use serde::Deserialize;
use tracing::debug;

use crate::error::CliError;
use crate::types::{self, ArgumentExpr, TypeExpr};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    #[serde(default)]
    pub config: Option<SessionConfig>,
    /// Packages with compiled top-level functions.
    #[serde(default)]
    pub packages: Vec<PackageSpec>,
    #[serde(default)]
    pub classes: Vec<ClassSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSpec {
    pub name: String,
    #[serde(default)]
    pub functions: Vec<FunctionSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassSpec {
    /// Qualified for top-level classes, simple for nested ones.
    pub name: String,
    #[serde(default)]
    pub kind: KindSpec,
    #[serde(default, rename = "final")]
    pub is_final: bool,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    /// Produced by this compiler; carries class metadata.
    #[serde(default)]
    pub compiled: bool,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterSpec>,
    #[serde(default)]
    pub methods: Vec<FunctionSpec>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub nested: Vec<ClassSpec>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindSpec {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
    Object,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionSpec {
    pub name: String,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default, rename = "final")]
    pub is_final: bool,
    /// The last parameter is variadic; its type is the element type.
    #[serde(default)]
    pub vararg: bool,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterSpec>,
    #[serde(default)]
    pub receiver: Option<String>,
    #[serde(default)]
    pub params: Vec<ParamSpec>,
    #[serde(default)]
    pub returns: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default, rename = "final")]
    pub is_final: bool,
    #[serde(default)]
    pub enum_entry: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeParameterSpec {
    pub name: String,
    #[serde(default)]
    pub bounds: Vec<String>,
    #[serde(default)]
    pub variance: VarianceSpec,
    #[serde(default)]
    pub reified: bool,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceSpec {
    #[default]
    Inv,
    In,
    Out,
}

pub fn load(path: &Path) -> Result<Fixture, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Parse {
        path: path.display().to_string(),
        source,
    })
}

impl Fixture {
    /// The fixture's configuration with environment overrides applied.
    pub fn session_config(&self) -> Result<SessionConfig, CliError> {
        Ok(self.config.clone().unwrap_or_default().with_env()?)
    }

    /// Build the platform. Compiled packages are stored under
    /// `package_class_name`.
    pub fn platform(&self, package_class_name: &str) -> Result<InMemoryPlatform, CliError> {
        let mut platform = InMemoryPlatform::new();
        for spec in &self.classes {
            let class = platform_class(spec, &spec.name)?;
            if spec.compiled {
                let bytes = class_metadata(spec)?;
                platform.add_compiled_class(class, MetadataKind::Class, bytes);
            } else {
                platform.add_class(class);
            }
        }
        for spec in &self.packages {
            let package = FqName::parse(&spec.name);
            let bytes = package_metadata(spec)?;
            debug!(package = %package, functions = spec.functions.len(), "compiled fixture package");
            platform.add_compiled_package(&package, package_class_name, bytes);
        }
        Ok(platform)
    }
}

fn class_kind(kind: KindSpec) -> ClassKind {
    match kind {
        KindSpec::Class => ClassKind::Class,
        KindSpec::Interface => ClassKind::Interface,
        KindSpec::Enum => ClassKind::Enum,
        KindSpec::Annotation => ClassKind::Annotation,
        KindSpec::Object => ClassKind::Object,
    }
}

fn platform_class(spec: &ClassSpec, name: &str) -> Result<PlatformClass, CliError> {
    let mut class = PlatformClass::new(name, class_kind(spec.kind));
    class.is_final = spec.is_final;
    class.is_abstract |= spec.is_abstract;
    class.is_static = spec.is_static;

    let variables: Vec<&str> = spec.type_parameters.iter().map(|p| p.name.as_str()).collect();
    class.type_parameters = platform_type_parameters(&spec.type_parameters, &variables)?;
    for method in &spec.methods {
        class = class.method(platform_method(method)?);
    }
    for field in &spec.fields {
        let mut member = PlatformField::new(&field.name, platform_type(&types::parse(&field.ty)?, &[]));
        member.is_static = field.is_static || field.enum_entry;
        member.is_final = field.is_final || field.enum_entry;
        member.is_enum_entry = field.enum_entry;
        class = class.field(member);
    }
    for nested in &spec.nested {
        class = class.nested_class(&nested.name, platform_class(nested, &nested.name)?);
    }
    Ok(class)
}

fn platform_method(spec: &FunctionSpec) -> Result<PlatformMethod, CliError> {
    let mut method = PlatformMethod::new(&spec.name);
    method.is_static = spec.is_static;
    method.is_abstract = spec.is_abstract;
    method.is_final = spec.is_final;
    method.is_vararg = spec.vararg;

    let variables: Vec<&str> = spec.type_parameters.iter().map(|p| p.name.as_str()).collect();
    method.type_parameters = platform_type_parameters(&spec.type_parameters, &variables)?;
    let last = spec.params.len().checked_sub(1);
    for (index, param) in spec.params.iter().enumerate() {
        let mut ty = platform_type(&types::parse(&param.ty)?, &variables);
        if spec.vararg && Some(index) == last {
            ty = PlatformType::Array(Box::new(ty));
        }
        method = method.param(&param.name, ty);
    }
    if let Some(returns) = &spec.returns {
        method = method.returns(platform_type(&types::parse(returns)?, &variables));
    }
    Ok(method)
}

fn platform_type_parameters(
    parameters: &[TypeParameterSpec],
    variables: &[&str],
) -> Result<Vec<PlatformTypeParameter>, CliError> {
    parameters
        .iter()
        .map(|parameter| -> Result<PlatformTypeParameter, CliError> {
            let bounds = parameter
                .bounds
                .iter()
                .map(|bound| -> Result<PlatformType, CliError> {
                    Ok(platform_type(&types::parse(bound)?, variables))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(PlatformTypeParameter::new(&parameter.name, bounds))
        })
        .collect()
}

/// Platform types carry no nullability; `?` is ignored.
fn platform_type(expr: &TypeExpr, variables: &[&str]) -> PlatformType {
    let primitive = match expr.name.as_str() {
        "boolean" => Some(PrimitiveKind::Boolean),
        "char" => Some(PrimitiveKind::Char),
        "byte" => Some(PrimitiveKind::Byte),
        "short" => Some(PrimitiveKind::Short),
        "int" => Some(PrimitiveKind::Int),
        "long" => Some(PrimitiveKind::Long),
        "float" => Some(PrimitiveKind::Float),
        "double" => Some(PrimitiveKind::Double),
        _ => None,
    };
    let mut ty = match (primitive, expr.name.as_str()) {
        (Some(kind), _) => PlatformType::Primitive(kind),
        (None, "void") => PlatformType::Void,
        (None, name) if variables.contains(&name) => PlatformType::variable(name),
        (None, name) => PlatformType::generic(
            name,
            expr.arguments
                .iter()
                .map(|argument| platform_argument(argument, variables))
                .collect(),
        ),
    };
    for _ in 0..expr.array_depth {
        ty = PlatformType::Array(Box::new(ty));
    }
    ty
}

fn platform_argument(argument: &ArgumentExpr, variables: &[&str]) -> PlatformType {
    match argument {
        ArgumentExpr::Star => PlatformType::Wildcard {
            bound: None,
            is_upper: true,
        },
        ArgumentExpr::Out(ty) => PlatformType::Wildcard {
            bound: Some(Box::new(platform_type(ty, variables))),
            is_upper: true,
        },
        ArgumentExpr::In(ty) => PlatformType::Wildcard {
            bound: Some(Box::new(platform_type(ty, variables))),
            is_upper: false,
        },
        ArgumentExpr::Invariant(ty) => platform_type(ty, variables),
    }
}

fn package_metadata(spec: &PackageSpec) -> Result<Vec<u8>, CliError> {
    let mut writer = MetadataWriter::default();
    let members = spec
        .functions
        .iter()
        .map(|function| writer.callable(function))
        .collect::<Result<Vec<_>, _>>()?;
    writer.finish(|_| Ok(Payload::Package(PackageRecord { members })))
}

fn class_metadata(spec: &ClassSpec) -> Result<Vec<u8>, CliError> {
    let mut writer = MetadataWriter::default();
    let mut scope = Vec::new();
    let type_parameters = writer.type_parameters(&spec.type_parameters, &mut scope)?;
    let kind = match spec.kind {
        KindSpec::Class => ClassKindRecord::Class,
        KindSpec::Interface => ClassKindRecord::Interface,
        KindSpec::Enum => ClassKindRecord::Enum,
        KindSpec::Annotation => ClassKindRecord::Annotation,
        KindSpec::Object => ClassKindRecord::Object,
    };
    writer.finish(|names| {
        Ok(Payload::Class(ClassRecord {
            fq_name: names.qualified(&FqName::parse(&spec.name))?,
            kind,
            type_parameters,
        }))
    })
}

/// Lowers fixture signatures into records sharing one name table.
#[derive(Default)]
struct MetadataWriter {
    names: NameTableBuilder,
    next_type_parameter: u32,
}

impl MetadataWriter {
    fn finish(
        mut self,
        payload: impl FnOnce(&mut NameTableBuilder) -> Result<Payload, CliError>,
    ) -> Result<Vec<u8>, CliError> {
        let payload = payload(&mut self.names)?;
        let envelope = MetadataEnvelope {
            names: self.names.finish(),
            payload,
        };
        Ok(descry_metadata::encode(&envelope)?)
    }

    fn callable(&mut self, spec: &FunctionSpec) -> Result<CallableRecord, CliError> {
        let mut scope = Vec::new();
        let type_parameters = self.type_parameters(&spec.type_parameters, &mut scope)?;
        let receiver_type = spec
            .receiver
            .as_deref()
            .map(|receiver| self.type_record(&types::parse(receiver)?, &scope))
            .transpose()?;

        let last = spec.params.len().checked_sub(1);
        let mut value_parameters = Vec::with_capacity(spec.params.len());
        for (index, param) in spec.params.iter().enumerate() {
            let ty = self.type_record(&types::parse(&param.ty)?, &scope)?;
            let (ty, vararg_element_type) = if spec.vararg && Some(index) == last {
                let array = self.names.qualified(&FqName::parse("lang.Array"))?;
                let array = TypeRecord::class(array, vec![TypeArgumentRecord::invariant(ty.clone())], false);
                (array, Some(ty))
            } else {
                (ty, None)
            };
            value_parameters.push(ValueParameterRecord {
                name: self.names.simple(&param.name),
                ty,
                vararg_element_type,
            });
        }
        let returns = spec.returns.as_deref().unwrap_or("lang.Unit");
        let return_type = self.type_record(&types::parse(returns)?, &scope)?;

        Ok(CallableRecord {
            name: self.names.simple(&spec.name),
            receiver_type,
            type_parameters,
            value_parameters,
            return_type,
        })
    }

    /// Ids are handed out first so bounds can name any parameter of the list.
    fn type_parameters(
        &mut self,
        parameters: &[TypeParameterSpec],
        scope: &mut Vec<(String, u32)>,
    ) -> Result<Vec<TypeParameterRecord>, CliError> {
        let ids: Vec<u32> = parameters
            .iter()
            .map(|parameter| {
                let id = self.next_type_parameter;
                self.next_type_parameter += 1;
                scope.push((parameter.name.clone(), id));
                id
            })
            .collect();

        let scope: &[(String, u32)] = scope;
        parameters
            .iter()
            .zip(ids)
            .map(|(parameter, id)| -> Result<TypeParameterRecord, CliError> {
                let upper_bounds = parameter
                    .bounds
                    .iter()
                    .map(|bound| self.type_record(&types::parse(bound)?, scope))
                    .collect::<Result<Vec<_>, CliError>>()?;
                Ok(TypeParameterRecord {
                    id,
                    name: self.names.simple(&parameter.name),
                    variance: match parameter.variance {
                        VarianceSpec::Inv => VarianceRecord::Inv,
                        VarianceSpec::In => VarianceRecord::In,
                        VarianceSpec::Out => VarianceRecord::Out,
                    },
                    reified: parameter.reified,
                    upper_bounds,
                })
            })
            .collect()
    }

    fn type_record(&mut self, expr: &TypeExpr, scope: &[(String, u32)]) -> Result<TypeRecord, CliError> {
        let arguments = expr
            .arguments
            .iter()
            .map(|argument| self.argument(argument, scope))
            .collect::<Result<Vec<_>, CliError>>()?;
        let parameter = scope
            .iter()
            .rev()
            .find(|(name, _)| name == &expr.name)
            .map(|(_, id)| *id);
        let mut record = match parameter {
            Some(id) => TypeRecord {
                constructor: TypeConstructorRecord::TypeParameter(id),
                arguments,
                nullable: false,
            },
            None => TypeRecord::class(self.names.qualified(&FqName::parse(&expr.name))?, arguments, false),
        };
        for _ in 0..expr.array_depth {
            let array = self.names.qualified(&FqName::parse("lang.Array"))?;
            record = TypeRecord::class(array, vec![TypeArgumentRecord::invariant(record)], false);
        }
        record.nullable = expr.nullable;
        Ok(record)
    }

    fn argument(&mut self, argument: &ArgumentExpr, scope: &[(String, u32)]) -> Result<TypeArgumentRecord, CliError> {
        let (projection, ty) = match argument {
            ArgumentExpr::Star => {
                let any = self.names.qualified(&FqName::parse("lang.Any"))?;
                (ProjectionRecord::Out, TypeRecord::class(any, Vec::new(), true))
            }
            ArgumentExpr::Out(ty) => (ProjectionRecord::Out, self.type_record(ty, scope)?),
            ArgumentExpr::In(ty) => (ProjectionRecord::In, self.type_record(ty, scope)?),
            ArgumentExpr::Invariant(ty) => (ProjectionRecord::Inv, self.type_record(ty, scope)?),
        };
        Ok(TypeArgumentRecord { projection, ty })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use descry_platform::{CompiledClassFinder, PlatformClassFinder};

    fn fixture(json: &str) -> Fixture {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn empty_fixture() {
        let fixture = fixture("{}");
        assert!(fixture.config.is_none());
        let platform = fixture.platform("_Package").unwrap();
        assert_eq!(platform.class_count(), 0);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<Fixture>(r#"{"classes": [{"name": "p.A", "kinds": "class"}]}"#).is_err());
    }

    #[test]
    fn config_section() {
        let fixture = fixture(r#"{"config": {"strategy": "eager"}}"#);
        let config = fixture.config.unwrap();
        assert_eq!(config.strategy, descry_resolve::Strategy::Eager);
        assert_eq!(config.package_class_name, "_Package");
    }

    #[test]
    fn classes_lower_to_platform_structure() {
        let fixture = fixture(
            r#"{"classes": [{
                "name": "util.Strings",
                "final": true,
                "methods": [
                    {"name": "join", "static": true, "vararg": true,
                     "params": [{"name": "parts", "type": "lang.String"}],
                     "returns": "lang.String"},
                    {"name": "first", "static": true,
                     "type_parameters": [{"name": "T"}],
                     "params": [{"name": "items", "type": "coll.List<out T>"}],
                     "returns": "T"}
                ],
                "fields": [{"name": "EMPTY", "type": "lang.String", "static": true, "final": true}],
                "nested": [{"name": "Builder", "static": true}]
            }]}"#,
        );
        let platform = fixture.platform("_Package").unwrap();
        let class = platform.find_class(&FqName::parse("util.Strings")).unwrap();
        assert!(class.is_final);
        assert!(class.methods[0].is_vararg);
        assert_eq!(
            class.methods[0].value_parameters[0].ty,
            PlatformType::Array(Box::new(PlatformType::class("lang.String")))
        );
        assert_eq!(class.methods[1].return_type, PlatformType::variable("T"));
        assert_eq!(
            class.methods[1].value_parameters[0].ty,
            PlatformType::generic(
                "coll.List",
                vec![PlatformType::Wildcard {
                    bound: Some(Box::new(PlatformType::variable("T"))),
                    is_upper: true,
                }]
            )
        );
        let builder = platform.find_class(&FqName::parse("util.Strings.Builder")).unwrap();
        assert!(builder.is_static);
        assert_eq!(builder.outer, Some(FqName::parse("util.Strings")));
    }

    #[test]
    fn packages_encode_two_pass_type_parameters() {
        let fixture = fixture(
            r#"{"packages": [{"name": "p", "functions": [{
                "name": "f",
                "type_parameters": [{"name": "T", "bounds": ["p.List<U>"]}, {"name": "U", "bounds": ["T"]}],
                "params": [{"name": "a", "type": "T?"}],
                "returns": "U"
            }]}]}"#,
        );
        let platform = fixture.platform("PKG").unwrap();
        let compiled = platform.find(&FqName::parse("p.PKG")).unwrap();
        let envelope = descry_metadata::decode(&compiled.bytes).unwrap();
        let record = &envelope.package().unwrap().members[0];

        let (t, u) = (&record.type_parameters[0], &record.type_parameters[1]);
        assert_eq!(u.upper_bounds, [TypeRecord::parameter(t.id)]);
        assert_eq!(
            t.upper_bounds[0].arguments[0].ty.constructor,
            TypeConstructorRecord::TypeParameter(u.id)
        );
        assert_eq!(record.value_parameters[0].ty.constructor, TypeConstructorRecord::TypeParameter(t.id));
        assert!(record.value_parameters[0].ty.nullable);
        assert!(record.receiver_type.is_none());
    }

    #[test]
    fn compiled_classes_carry_class_metadata() {
        let fixture = fixture(
            r#"{"classes": [{"name": "p.Box", "compiled": true,
                "type_parameters": [{"name": "T", "variance": "out"}]}]}"#,
        );
        let platform = fixture.platform("_Package").unwrap();
        let class = platform.find_class(&FqName::parse("p.Box")).unwrap();
        assert_eq!(class.compiled_metadata, Some(MetadataKind::Class));
        let envelope = descry_metadata::decode(&platform.find(&FqName::parse("p.Box")).unwrap().bytes).unwrap();
        let record = envelope.class().unwrap();
        assert_eq!(record.type_parameters[0].variance, VarianceRecord::Out);
        assert_eq!(
            envelope.names.to_name_table().fq_name(record.fq_name).unwrap(),
            FqName::parse("p.Box")
        );
    }

    #[test]
    fn bad_type_text_is_reported() {
        let fixture = fixture(r#"{"classes": [{"name": "p.A", "fields": [{"name": "x", "type": "p.List<"}]}]}"#);
        assert!(matches!(fixture.platform("_Package"), Err(CliError::Type { .. })));
    }
}
