//! # Logging
//!
//! Sets up `tracing` for `mark-cli`. Everything goes to stderr so stdout only
//! carries command output and can be piped.
//!
//! Precedence, highest first: `RUST_LOG`, then `--log-level` raised by each
//! `-v`.

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One line per event, no timestamps.
    Compact,
    /// Human-readable with source locations.
    Pretty,
    /// JSON lines.
    Json,
}

/// Filter directive for a base level and a `-v` count. Verbosity only
/// raises the MARK crates; dependencies stay at `level`.
pub fn filter_directive(level: &str, verbose: u8) -> String {
    match verbose {
        0 => level.to_string(),
        1 => format!("{level},mark_protocol=debug,mark_cli=debug"),
        _ => format!("{level},mark_protocol=trace,mark_cli=trace"),
    }
}

/// Installs the global subscriber. Fails if `directive` does not parse or a
/// subscriber is already installed.
pub fn init_logging(directive: &str, format: LogFormat) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter {directive:?}"))?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .without_time()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    }
    .context("tracing subscriber already installed")?;

    tracing::debug!(?format, directive, "logging initialized");
    Ok(())
}
