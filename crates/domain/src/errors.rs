//! Error types used throughout the exporter

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for tillstat
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum TillstatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Upstream error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),

    #[error("Metrics error: {0}")]
    Metrics(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TillstatError {
    /// Stable label suitable for metric labels and log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Network(_) => "network",
            Self::Auth(_) => "auth",
            Self::RateLimited(_) => "rate_limited",
            Self::Upstream { .. } => "upstream",
            Self::InvalidResponse(_) => "invalid_response",
            Self::Metrics(_) => "metrics",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for tillstat operations
pub type Result<T> = std::result::Result<T, TillstatError>;
