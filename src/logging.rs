//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter (e.g. `agrichat_cli=trace`).
pub const LOG_ENV: &str = "AGRICHAT_LOG";

/// Maps the number of `-v` flags to a default filter directive.
pub fn default_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    format!("agrichat_cli={level}")
}

/// Installs the global `tracing` subscriber writing to stderr.
///
/// `AGRICHAT_LOG` takes precedence over the verbosity flags. Calling this twice
/// is harmless; the second subscriber is discarded.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!crate::output::is_no_color())
        .with_target(false)
        .try_init();
}
