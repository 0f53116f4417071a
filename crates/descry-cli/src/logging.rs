// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Diagnostics on stderr through tracing-subscriber.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Filter directives, e.g. `DESCRY_LOG=descry_resolve=debug`.
const LOG_VAR: &str = "DESCRY_LOG";

/// Send diagnostics to stderr. Only warnings show unless `DESCRY_LOG`
/// says otherwise.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    let use_ansi = std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(use_ansi)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
