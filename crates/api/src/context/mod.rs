//! Application context - dependency injection container

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use tillstat_core::ScrapeService;
use tillstat_domain::{Config, FetchErrorPolicy, Result, TillstatError};
use tillstat_infra::{ExporterMetrics, SquareClient};
use tracing::{info, warn};

/// Application context - holds the scrape service and the gauge set
pub struct AppContext {
    pub scrape_service: Arc<ScrapeService>,
    pub metrics: Arc<ExporterMetrics>,
    pub on_fetch_error: FetchErrorPolicy,
}

impl AppContext {
    /// Wire the Square client, scrape service and metrics registry from
    /// configuration.
    ///
    /// Looks up the location's currency once. A failed lookup is logged and
    /// the configured default currency is used instead.
    ///
    /// # Errors
    /// Returns an error if the Square client or the metrics registry cannot
    /// be created.
    pub async fn new(config: &Config) -> Result<Self> {
        let client = SquareClient::new(&config.square)?;

        let currency = match client.fetch_location_currency().await {
            Ok(Some(currency)) => {
                info!(currency = %currency, "Detected account currency");
                Some(currency)
            }
            Ok(None) => {
                warn!("Could not determine currency from location data; reporting minor units");
                config.square.default_currency.clone()
            }
            Err(err) => {
                warn!(kind = err.label(), error = %err, "Location lookup failed");
                config.square.default_currency.clone()
            }
        };

        let scrape_service = ScrapeService::new(Arc::new(client), config.scrape.window_hours)
            .with_default_currency(currency);

        Ok(Self::from_parts(
            scrape_service,
            ExporterMetrics::new()?,
            config.scrape.on_fetch_error,
        ))
    }

    /// Assemble a context from already-built parts
    pub fn from_parts(
        scrape_service: ScrapeService,
        metrics: ExporterMetrics,
        on_fetch_error: FetchErrorPolicy,
    ) -> Self {
        Self {
            scrape_service: Arc::new(scrape_service),
            metrics: Arc::new(metrics),
            on_fetch_error,
        }
    }
}

/// Socket address the exporter listens on
///
/// # Errors
/// Returns `TillstatError::Config` if the bind address is not an IP address.
pub fn listen_addr(config: &Config) -> Result<SocketAddr> {
    let ip: IpAddr = config.server.bind_address.parse().map_err(|err| {
        TillstatError::Config(format!(
            "invalid bind address {:?}: {err}",
            config.server.bind_address
        ))
    })?;
    Ok(SocketAddr::new(ip, config.server.port))
}
