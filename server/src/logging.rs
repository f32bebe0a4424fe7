//! Process-wide logging setup.
//!
//! Library code logs through the `log` facade; `tracing_log::LogTracer`
//! forwards those records into the tracing subscriber installed here, so
//! `log::info!` lines and tracing spans end up in one output.

use anyhow::{Context, Result};
use atpl_extractor::config::LoggingConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured filter.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .with_context(|| format!("Invalid log filter '{}'", config.filter))?;

    let format_layer = if config.json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    };

    let subscriber = Registry::default().with(filter).with(format_layer);

    tracing_log::LogTracer::init().context("Failed to bridge log records")?;
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
