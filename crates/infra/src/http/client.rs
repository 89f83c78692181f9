use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tillstat_domain::{Result, TillstatError};
use tracing::debug;

use crate::errors::InfraError;

const USER_AGENT: &str = concat!("tillstat/", env!("CARGO_PKG_VERSION"));

/// HTTP client with a request timeout and default headers.
///
/// Every request is sent exactly once; there is no retry. A failed send
/// fails the caller's operation.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder once.
    ///
    /// Non-success statuses are returned as responses; only transport failures
    /// (connect, timeout, invalid request) become errors.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build().map_err(|err| TillstatError::from(InfraError::from(err)))?;

        let method = request.method().clone();
        let url = redact_query(request.url());
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, %url, status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(InfraError::from(err).into())
            }
        }
    }
}

fn redact_query(url: &reqwest::Url) -> String {
    let mut printable = url.clone();
    printable.set_query(None);
    printable.to_string()
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    default_headers: HeaderMap,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), default_headers: HeaderMap::new() }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add a single default header.
    ///
    /// # Errors
    /// Returns `TillstatError::Config` if the name or value is not a valid
    /// header.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| TillstatError::Config(format!("invalid header name {name}: {err}")))?;
        let mut value = HeaderValue::from_str(value)
            .map_err(|err| TillstatError::Config(format!("invalid value for {name}: {err}")))?;
        if name == reqwest::header::AUTHORIZATION {
            value.set_sensitive(true);
        }
        self.default_headers.insert(name, value);
        Ok(self)
    }

    pub fn build(self) -> Result<HttpClient> {
        let mut builder =
            ReqwestClient::builder().timeout(self.timeout).user_agent(USER_AGENT).no_proxy();

        if !self.default_headers.is_empty() {
            builder = builder.default_headers(self.default_headers);
        }

        let client = builder.build().map_err(|err| TillstatError::from(InfraError::from(err)))?;

        Ok(HttpClient { client })
    }
}
