//! Conversions from external infrastructure errors into domain errors.

use prometheus::Error as PrometheusError;
use reqwest::Error as HttpError;
use reqwest::StatusCode;
use tillstat_domain::TillstatError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub TillstatError);

impl From<InfraError> for TillstatError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<TillstatError> for InfraError {
    fn from(value: TillstatError) -> Self {
        InfraError(value)
    }
}

impl InfraError {
    /// Classify a non-success HTTP status returned by an upstream API.
    ///
    /// `detail` is the most specific message available from the response body.
    pub fn from_status(status: StatusCode, detail: Option<String>) -> Self {
        let code = status.as_u16();
        let message = detail.unwrap_or_else(|| {
            format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"))
        });

        InfraError(match code {
            401 | 403 => TillstatError::Auth(message),
            429 => TillstatError::RateLimited(message),
            _ => TillstatError::Upstream { status: code, message },
        })
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoTillstatError {
    fn into_tillstat(self) -> TillstatError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TillstatError */
/* -------------------------------------------------------------------------- */

impl IntoTillstatError for HttpError {
    fn into_tillstat(self) -> TillstatError {
        if self.is_timeout() {
            return TillstatError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return TillstatError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return InfraError::from_status(status, None).0;
        }

        if self.is_decode() {
            return TillstatError::InvalidResponse(self.to_string());
        }

        if self.is_builder() {
            return TillstatError::Internal(format!("invalid HTTP request: {self}"));
        }

        TillstatError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_tillstat())
    }
}

/* -------------------------------------------------------------------------- */
/* prometheus::Error → TillstatError */
/* -------------------------------------------------------------------------- */

impl IntoTillstatError for PrometheusError {
    fn into_tillstat(self) -> TillstatError {
        match self {
            PrometheusError::AlreadyReg => {
                TillstatError::Metrics("metric already registered".into())
            }
            other => TillstatError::Metrics(other.to_string()),
        }
    }
}

impl From<PrometheusError> for InfraError {
    fn from(value: PrometheusError) -> Self {
        InfraError(value.into_tillstat())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
