//! Configuration structures
//!
//! Loading lives in `tillstat-infra::config`; this module only describes the
//! shape of the configuration and its validation rules.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_EXPORTER_PORT, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_WINDOW_HOURS, MAX_WINDOW_HOURS, SQUARE_API_BASE, SQUARE_API_VERSION,
};
use crate::errors::{Result, TillstatError};
use crate::impl_domain_status_conversions;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub square: SquareConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scrape: ScrapeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Square API credentials and endpoint settings
#[derive(Clone, Serialize, Deserialize)]
pub struct SquareConfig {
    #[serde(skip_serializing)]
    pub access_token: String,
    pub location_id: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Currency used for log annotation when records carry none.
    #[serde(default)]
    pub default_currency: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl fmt::Debug for SquareConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SquareConfig")
            .field("access_token", &"<redacted>")
            .field("location_id", &self.location_id)
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("default_currency", &self.default_currency)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl SquareConfig {
    /// Build a config with the given credentials and default endpoint settings.
    pub fn new(access_token: impl Into<String>, location_id: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            location_id: location_id.into(),
            base_url: default_base_url(),
            api_version: default_api_version(),
            default_currency: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port(), bind_address: default_bind_address() }
    }
}

/// What `/metrics` returns when the upstream fetch fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorPolicy {
    /// Respond 200 with the last successfully computed gauge values.
    #[default]
    ServeStale,
    /// Respond 503 for that scrape.
    Fail,
}

impl_domain_status_conversions!(FetchErrorPolicy {
    ServeStale => "serve_stale",
    Fail => "fail",
});

/// Scrape behaviour configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    #[serde(default = "default_window_hours")]
    pub window_hours: u32,
    #[serde(default)]
    pub on_fetch_error: FetchErrorPolicy,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self { window_hours: default_window_hours(), on_fetch_error: FetchErrorPolicy::default() }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl_domain_status_conversions!(LogFormat {
    Pretty => "pretty",
    Json => "json",
});

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

impl Config {
    /// Build a config from credentials, leaving every other section at its
    /// default.
    pub fn with_credentials(
        access_token: impl Into<String>,
        location_id: impl Into<String>,
    ) -> Self {
        Self {
            square: SquareConfig::new(access_token, location_id),
            server: ServerConfig::default(),
            scrape: ScrapeConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Check the invariants a loaded configuration must satisfy before the
    /// exporter starts serving.
    ///
    /// # Errors
    /// Returns `TillstatError::Config` describing the first violated rule.
    pub fn validate(&self) -> Result<()> {
        if self.square.access_token.trim().is_empty() {
            return Err(TillstatError::Config("Square access token must not be empty".into()));
        }
        if self.square.location_id.trim().is_empty() {
            return Err(TillstatError::Config("Square location id must not be empty".into()));
        }
        if self.square.base_url.trim().is_empty() {
            return Err(TillstatError::Config("Square API base URL must not be empty".into()));
        }
        if self.square.request_timeout_secs == 0 {
            return Err(TillstatError::Config("request timeout must be at least 1 second".into()));
        }
        if self.scrape.window_hours == 0 {
            return Err(TillstatError::Config("look-back window must be at least 1 hour".into()));
        }
        if self.scrape.window_hours > MAX_WINDOW_HOURS {
            return Err(TillstatError::Config(format!(
                "look-back window must be at most {MAX_WINDOW_HOURS} hours, got {}",
                self.scrape.window_hours
            )));
        }
        if self.server.port == 0 {
            return Err(TillstatError::Config("exporter port must not be 0".into()));
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    SQUARE_API_BASE.to_string()
}

fn default_api_version() -> String {
    SQUARE_API_VERSION.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_port() -> u16 {
    DEFAULT_EXPORTER_PORT
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

fn default_window_hours() -> u32 {
    DEFAULT_WINDOW_HOURS
}
