// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Descry CLI: inspect how a platform description resolves into
//! declarations.

mod commands;
mod error;
mod fixture;
mod logging;
mod output;
mod types;

use std::env;
use std::path::Path;
use std::process;

use error::CliError;

fn main() {
    output::init();
    logging::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    let result = match args[1].as_str() {
        "package" => with_session(&args, "package <fixture> <name>", |session, name| {
            commands::package(session, name)
        }),
        "class" => with_session(&args, "class <fixture> <name>", |session, name| {
            commands::class(session, name)
        }),
        "subpackages" => with_session(&args, "subpackages <fixture> [name]", |session, name| {
            commands::sub_packages(session, name)
        }),
        "classes" => with_session(&args, "classes <fixture> <name>", |session, name| {
            Ok(commands::classes(session, name))
        }),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        "version" | "--version" | "-V" => {
            println!("descry {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => Err(CliError::Usage(format!("unknown command `{}`", other))),
    };

    if let Err(err) = result {
        eprintln!("{}: {}", output::error_label(), err);
        process::exit(1);
    }
}

/// Load the fixture named by `args[2]`, run `query` on the name in
/// `args[3]` and print the report. Only `subpackages` may omit the name.
fn with_session(
    args: &[String],
    usage: &str,
    query: impl FnOnce(&descry_resolve::ResolutionSession, &str) -> Result<commands::Report, CliError>,
) -> Result<(), CliError> {
    let name_optional = usage.ends_with("[name]");
    let (fixture, name) = match args {
        [_, _, fixture, name, ..] => (fixture, name.as_str()),
        [_, _, fixture] if name_optional => (fixture, ""),
        _ => return Err(CliError::Usage(format!("descry {}", usage))),
    };
    let session = commands::open(Path::new(fixture))?;
    query(&session, name)?.print();
    Ok(())
}

fn print_usage() {
    println!(
        "{} {} - resolve platform packages and classes",
        output::title("Descry"),
        output::version(env!("CARGO_PKG_VERSION"))
    );
    println!();
    println!(
        "{}: {} {} {} {}",
        output::section_header("Usage"),
        output::command("descry"),
        output::arg("<command>"),
        output::arg("<fixture.json>"),
        output::arg("[name]")
    );
    println!();
    println!("{}", output::section_header("Commands:"));
    println!("  {} {}      Members of a package or namespace", output::command("package"), output::arg("<name>"));
    println!("  {} {}        Header of a class", output::command("class"), output::arg("<name>"));
    println!("  {} {}  Packages nested under a package", output::command("subpackages"), output::arg("[name]"));
    println!("  {} {}      Compiled classes of a package", output::command("classes"), output::arg("<name>"));
    println!("  {}                 Show this help", output::command("help"));
    println!("  {}              Show version", output::command("version"));
    println!();
    println!("{}", output::section_header("Environment:"));
    println!("  {}   lazy or eager", output::arg("DESCRY_STRATEGY"));
    println!("  {}  Simple name of compiled package classes", output::arg("DESCRY_PACKAGE_CLASS"));
    println!("  {}        Log filter, e.g. descry_resolve=debug", output::arg("DESCRY_LOG"));
}
