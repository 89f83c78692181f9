use std::time::Duration;

use tillstat_domain::{LogFormat, LoggingConfig, TillstatError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; without it everything at `info` and above is
/// logged. Fails if a subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = match config.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .try_init(),
        LogFormat::Pretty => {
            tracing_subscriber::fmt().with_env_filter(env_filter).with_target(true).try_init()
        }
    };

    result.map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))
}

/// Log the outcome of one scrape with structured fields.
///
/// Failures carry the stable error label so log queries and the
/// `kind` label of the error counter line up.
#[inline]
pub fn log_scrape_outcome(elapsed: Duration, error: Option<&TillstatError>) {
    let duration_ms = elapsed.as_millis() as u64;

    match error {
        None => info!(duration_ms, "scrape_success"),
        Some(err) => warn!(duration_ms, kind = err.label(), error = %err, "scrape_failure"),
    }
}
