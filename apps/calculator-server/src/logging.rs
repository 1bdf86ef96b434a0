//! Console logging setup.
//!
//! `RUST_LOG` wins when set; otherwise the level comes from `-v` flags and
//! then from `logging.console_level`. Output goes to stderr so stdout stays
//! clean for `check` and `--print-config`.

use anyhow::{Result, anyhow};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::{LogFormat, LoggingConfig};

/// Level implied by repeated `-v` flags, if any.
#[must_use]
pub fn verbosity_level(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

fn build_filter(cfg: &LoggingConfig, verbose: u8) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let level = verbosity_level(verbose).unwrap_or(cfg.console_level.as_str());
    EnvFilter::try_new(level).map_err(|e| anyhow!("invalid log level '{level}': {e}"))
}

/// Install the global subscriber.
///
/// # Errors
/// Returns an error if the level cannot be parsed or a subscriber is
/// already installed.
pub fn init(cfg: &LoggingConfig, verbose: u8) -> Result<()> {
    let filter = build_filter(cfg, verbose)?;

    let layer = match cfg.format {
        LogFormat::Text => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))
}
