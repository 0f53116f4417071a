// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Queries behind each subcommand. Results are plain text; styling is
//! applied when printing.

use std::path::Path;
use std::sync::Arc;

use descry_model::FqName;
use descry_resolve::{render, ResolutionSession, SearchRule, SourceClassRegistry};

use crate::error::CliError;
use crate::fixture::{self, Fixture};
use crate::output;

#[derive(Debug, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    pub note: Option<String>,
    pub lines: Vec<String>,
}

impl Report {
    pub fn print(&self) {
        match &self.note {
            Some(note) => println!("{} {}", output::heading(&self.title), output::note(&format!("({})", note))),
            None => println!("{}", output::heading(&self.title)),
        }
        for line in &self.lines {
            println!("  {}", output::member(line));
        }
    }
}

pub fn open(path: &Path) -> Result<ResolutionSession, CliError> {
    session(&fixture::load(path)?)
}

pub fn session(fixture: &Fixture) -> Result<ResolutionSession, CliError> {
    let config = fixture.session_config()?;
    let platform = Arc::new(fixture.platform(&config.package_class_name)?);
    Ok(ResolutionSession::new(
        config,
        platform.clone(),
        platform,
        Arc::new(SourceClassRegistry::new()),
    )?)
}

/// Every member of a package.
pub fn package(session: &ResolutionSession, name: &str) -> Result<Report, CliError> {
    let fragment = session
        .resolve_package(&parse_name(name), SearchRule::IncludeSource)?
        .ok_or_else(|| not_found("package", name))?;
    Ok(Report {
        title: render::declaration(session, fragment.decl())?,
        note: Some(fragment.kind().describe().to_string()),
        lines: render::scope(session, fragment.scope())?,
    })
}

pub fn class(session: &ResolutionSession, name: &str) -> Result<Report, CliError> {
    let class = session
        .resolve_class(&parse_name(name), SearchRule::IncludeSource)?
        .ok_or_else(|| not_found("class", name))?;
    let decl = session.declaration(class)?;
    let container = match decl.containing() {
        Some(container) => vec![format!("in {}", render::declaration(session, container)?)],
        None => Vec::new(),
    };
    Ok(Report {
        title: render::declaration(session, class)?,
        note: Some(format!("{:?}", decl.origin()).to_lowercase()),
        lines: container,
    })
}

pub fn sub_packages(session: &ResolutionSession, name: &str) -> Result<Report, CliError> {
    let fq_name = parse_name(name);
    let packages = session.sub_packages(&fq_name)?;
    Ok(Report {
        title: package_title(&fq_name),
        note: Some(format!("{} sub-packages", packages.len())),
        lines: packages.iter().map(ToString::to_string).collect(),
    })
}

/// Classes this compiler produced in a platform package.
pub fn classes(session: &ResolutionSession, name: &str) -> Report {
    let fq_name = parse_name(name);
    let names = session.class_names_in_package(&fq_name);
    Report {
        title: package_title(&fq_name),
        note: Some(format!("{} compiled classes", names.len())),
        lines: names.iter().map(ToString::to_string).collect(),
    }
}

/// `<root>` and the empty string both name the root package.
fn parse_name(name: &str) -> FqName {
    match name {
        "" | "<root>" => FqName::root(),
        name => FqName::parse(name),
    }
}

fn package_title(fq_name: &FqName) -> String {
    if fq_name.is_root() {
        "package <root>".to_string()
    } else {
        format!("package {}", fq_name)
    }
}

fn not_found(what: &'static str, name: &str) -> CliError {
    CliError::NotFound {
        what,
        name: name.to_string(),
    }
}
