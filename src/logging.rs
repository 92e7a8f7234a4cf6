//! Tracing setup shared by the binaries

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `octopus_tools=debug`
pub const LOG_ENV: &str = "OCTOPUS_LOG";

/// Install a stderr subscriber filtered by `OCTOPUS_LOG`, else `default_filter`.
///
/// Stdout stays untouched so the language server can speak JSON-RPC on it.
/// Calling this twice is harmless.
pub fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
