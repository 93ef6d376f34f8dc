//! Tracing subscriber setup for the binary.

use anyhow::{anyhow, Result};
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use crate::formatter::FrameFormatter;

/// Installs the global subscriber: frame-stamped lines filtered by `RUST_LOG`, falling back to
/// `default_filter` when it is unset or invalid.
pub fn init(default_filter: &str) -> Result<()> {
    let subscriber = tracing_subscriber::registry()
        .with(fmt::layer().event_format(FrameFormatter))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(subscriber).map_err(|e| anyhow!("Failed to set tracing subscriber: {}", e))
}
