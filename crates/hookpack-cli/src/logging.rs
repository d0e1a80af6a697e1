use std::io;

use anyhow::{Context, Result};
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_LOG_FILTER: &str = "warn";

pub fn build_filter(directives: Option<&str>) -> Result<EnvFilter> {
    let directives = directives.unwrap_or(DEFAULT_LOG_FILTER);
    EnvFilter::try_new(directives)
        .with_context(|| format!("failed to create tracing filter from '{directives}'"))
}

/// Installs the global subscriber. Logs go to stderr so they never mix with
/// the output of the forwarded binary.
pub fn init_logging(directives: Option<&str>, ansi: bool) -> Result<()> {
    let layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(ansi);

    tracing_subscriber::registry()
        .with(build_filter(directives)?)
        .with(layer)
        .try_init()
        .context("failed to initialise logging")
}
