// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Deterministic text for declarations, types and scopes.
//!
//! Output only depends on names and structure, never on declaration ids,
//! so two sessions over the same input render identically.

use descry_model::{Attributes, ClassKind, DeclId, DeclKind, Type, TypeProjection, Variance};

use crate::error::ResolveError;
use crate::scope::Scope;
use crate::session::ResolutionSession;

/// One line describing a declaration, e.g.
/// `fun <T : lang.Any> f(a: lang.Int): lang.String`.
pub fn declaration(session: &ResolutionSession, id: DeclId) -> Result<String, ResolveError> {
    let decl = session.declaration(id)?;
    let text = match decl.kind() {
        DeclKind::Module => format!("module {}", decl.name()),
        DeclKind::PackageFragment { fq_name } if fq_name.is_root() => "package <root>".to_string(),
        DeclKind::PackageFragment { fq_name } => format!("package {}", fq_name),
        DeclKind::Class(header) => {
            let keyword = match header.kind {
                ClassKind::Class => "class",
                ClassKind::Interface => "interface",
                ClassKind::Enum => "enum class",
                ClassKind::Annotation => "annotation class",
                ClassKind::Object => "object",
            };
            let inner = if header.is_inner { "inner " } else { "" };
            let parameters = session.class_type_parameters(id)?;
            format!(
                "{}{} {}{}",
                inner,
                keyword,
                header.fq_name,
                type_parameter_list(session, &parameters)?
            )
        }
        DeclKind::Function => {
            let attrs = decl.as_function()?;
            let receiver = match &attrs.receiver_type {
                Some(receiver) => format!("{}.", ty(session, receiver)?),
                None => String::new(),
            };
            let parameters = attrs
                .value_parameters
                .iter()
                .map(|parameter| declaration(session, *parameter))
                .collect::<Result<Vec<_>, _>>()?;
            let type_parameters = type_parameter_list(session, &attrs.type_parameters)?;
            let type_parameters = if type_parameters.is_empty() {
                type_parameters
            } else {
                format!("{} ", type_parameters)
            };
            format!(
                "fun {}{}{}({}): {}",
                type_parameters,
                receiver,
                decl.name(),
                parameters.join(", "),
                ty(session, &attrs.return_type)?
            )
        }
        DeclKind::Property => {
            let attrs = decl.as_property()?;
            let keyword = if attrs.is_var { "var" } else { "val" };
            format!("{} {}: {}", keyword, decl.name(), ty(session, &attrs.ty)?)
        }
        DeclKind::ValueParameter => {
            let attrs = decl.as_value_parameter()?;
            match &attrs.vararg_element_type {
                Some(element) => format!("vararg {}: {}", decl.name(), ty(session, element)?),
                None => format!("{}: {}", decl.name(), ty(session, &attrs.ty)?),
            }
        }
        DeclKind::TypeParameter { variance, reified, .. } => {
            let mut text = String::new();
            if *reified {
                text.push_str("reified ");
            }
            if *variance != Variance::Invariant {
                text.push_str(variance.label());
                text.push(' ');
            }
            text.push_str(decl.name().as_str());
            if let Attributes::TypeParameter(attrs) = decl.attributes()? {
                let bounds = attrs
                    .upper_bounds
                    .iter()
                    .map(|bound| ty(session, bound))
                    .collect::<Result<Vec<_>, _>>()?;
                if !bounds.is_empty() {
                    text.push_str(" : ");
                    text.push_str(&bounds.join(" & "));
                }
            }
            text
        }
    };
    Ok(text)
}

pub fn ty(session: &ResolutionSession, value: &Type) -> Result<String, ResolveError> {
    let (mut text, nullable) = match value {
        Type::Class {
            class,
            arguments,
            nullable,
        } => {
            let decl = session.declaration(*class)?;
            let name = match decl.class_header() {
                Some(header) => header.fq_name.to_string(),
                None => decl.name().to_string(),
            };
            (format!("{}{}", name, argument_list(session, arguments)?), *nullable)
        }
        Type::Parameter {
            parameter,
            nullable,
        } => (session.declaration(*parameter)?.name().to_string(), *nullable),
        Type::Unresolved {
            fq_name,
            arguments,
            nullable,
        } => (
            format!("unresolved {}{}", fq_name, argument_list(session, arguments)?),
            *nullable,
        ),
    };
    if nullable {
        text.push('?');
    }
    Ok(text)
}

/// Every member of a scope, one line each, in scope order.
pub fn scope(session: &ResolutionSession, scope: &Scope) -> Result<Vec<String>, ResolveError> {
    scope
        .all_descriptors(session)?
        .into_iter()
        .map(|member| declaration(session, member))
        .collect()
}

fn type_parameter_list(session: &ResolutionSession, parameters: &[DeclId]) -> Result<String, ResolveError> {
    if parameters.is_empty() {
        return Ok(String::new());
    }
    let parameters = parameters
        .iter()
        .map(|parameter| declaration(session, *parameter))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("<{}>", parameters.join(", ")))
}

fn argument_list(session: &ResolutionSession, arguments: &[TypeProjection]) -> Result<String, ResolveError> {
    if arguments.is_empty() {
        return Ok(String::new());
    }
    let arguments = arguments
        .iter()
        .map(|argument| -> Result<String, ResolveError> {
            let text = ty(session, &argument.ty)?;
            Ok(match argument.variance {
                Variance::Invariant => text,
                variance => format!("{} {}", variance.label(), text),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("<{}>", arguments.join(", ")))
}
