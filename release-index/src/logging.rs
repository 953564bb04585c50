//! Logging init: structured events on stderr, JSON lines or human-readable text.
//!
//! stdout is reserved for the run summary.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::cli::{LogLevel, OutputFormat};

/// Filter used when `RUST_LOG` is unset.
fn default_filter(level: LogLevel) -> EnvFilter {
    let level = level.as_str();
    EnvFilter::new(format!("{level},release_index={level},release_index_core={level}"))
}

/// Install the global subscriber. Returns Err if one is already installed.
pub fn init_logging(level: LogLevel, format: OutputFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);

    match format {
        OutputFormat::Json => builder.json().try_init(),
        OutputFormat::Text => builder.try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
