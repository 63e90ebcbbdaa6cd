//! Tracing subscriber setup for the command-line binary.

use tracing::Level;
use tracing_subscriber::{EnvFilter, prelude::*};

/// Installs the global tracing subscriber.
///
/// Events go to stderr so step output on stdout stays machine-readable.
/// `RUST_LOG` overrides the default level (`warn` when `quiet`, else `info`).
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(quiet: bool) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let default_level = if quiet { Level::WARN } else { Level::INFO };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(default_level.into()));

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false));

    tracing::subscriber::set_global_default(subscriber)
}
