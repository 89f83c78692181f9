/// Square API client for listing payments and refunds
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tillstat_core::TransactionSource;
use tillstat_domain::constants::SQUARE_PAGE_LIMIT;
use tillstat_domain::{Result, SquareConfig, TillstatError, Transaction, Window};
use tracing::{debug, info};

use super::types::{ErrorBody, ListPage, Listing, LocationResponse};
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Square Connect API client bound to one location
#[derive(Clone)]
pub struct SquareClient {
    http_client: HttpClient,
    base_url: String,
    location_id: String,
}

impl SquareClient {
    /// Create a new Square client from configuration
    ///
    /// The access token, API version and content type are installed as
    /// default headers on the underlying HTTP client, and
    /// `request_timeout_secs` bounds every request.
    ///
    /// # Errors
    /// Returns `TillstatError::Config` if the token or API version cannot be
    /// sent as a header.
    pub fn new(config: &SquareConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .header("Authorization", &format!("Bearer {}", config.access_token))?
            .header("Square-Version", &config.api_version)?
            .header("Content-Type", "application/json")?
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            location_id: config.location_id.clone(),
        })
    }

    /// Point the client at a different API host
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn location_id(&self) -> &str {
        &self.location_id
    }

    /// Look up the currency of the configured location
    ///
    /// Returns `Ok(None)` when Square reports no currency for the location.
    ///
    /// # Errors
    /// Returns the mapped `TillstatError` if the request fails or the body
    /// cannot be decoded.
    pub async fn fetch_location_currency(&self) -> Result<Option<String>> {
        let url = format!("{}/v2/locations/{}", self.base_url, self.location_id);
        let response: LocationResponse =
            self.get_json(self.http_client.request(Method::GET, &url)).await?;

        let currency = response
            .location
            .and_then(|location| location.currency)
            .filter(|currency| !currency.is_empty());

        debug!(location_id = %self.location_id, currency = ?currency, "retrieved location");
        Ok(currency)
    }

    /// List every record of `listing` created inside `window`, following the
    /// cursor until the last page.
    async fn list(&self, listing: Listing, window: &Window) -> Result<Vec<Transaction>> {
        let url = format!("{}/v2/{}", self.base_url, listing.path());
        let begin_time = window.begin_time();
        let end_time = window.end_time();
        let limit = SQUARE_PAGE_LIMIT.to_string();

        let mut transactions = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let mut query: Vec<(&str, &str)> = vec![
                ("begin_time", begin_time.as_str()),
                ("end_time", end_time.as_str()),
                ("location_id", self.location_id.as_str()),
                ("sort_order", "ASC"),
                ("limit", limit.as_str()),
            ];
            if let Some(cursor) = cursor.as_deref() {
                query.push(("cursor", cursor));
            }

            let request = self.http_client.request(Method::GET, &url).query(&query);
            let page: ListPage = self.get_json(request).await?;
            pages += 1;

            let (records, next) = page.into_parts(listing);
            debug!(listing = listing.path(), page = pages, records = records.len(), "fetched page");

            for record in records {
                transactions.push(record.into_transaction(listing.kind())?);
            }

            match next {
                Some(next) if cursor.as_deref() == Some(next.as_str()) => {
                    return Err(TillstatError::InvalidResponse(format!(
                        "Square returned the same {} cursor twice",
                        listing.path()
                    )));
                }
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        info!(
            listing = listing.path(),
            pages,
            records = transactions.len(),
            "listed Square transactions"
        );
        Ok(transactions)
    }

    /// Send `request` and decode a successful JSON body
    ///
    /// Non-success statuses are classified with the first error detail Square
    /// put in the body.
    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.http_client.send(request).await?;
        let status = response.status();
        let body = response.bytes().await.map_err(|err| TillstatError::from(InfraError::from(err)))?;

        if !status.is_success() {
            let detail =
                serde_json::from_slice::<ErrorBody>(&body).ok().and_then(|b| b.first_message());
            return Err(InfraError::from_status(status, detail).into());
        }

        serde_json::from_slice(&body).map_err(|err| {
            TillstatError::InvalidResponse(format!("Failed to decode Square response: {err}"))
        })
    }
}

#[async_trait]
impl TransactionSource for SquareClient {
    async fn fetch_payments(&self, window: &Window) -> Result<Vec<Transaction>> {
        self.list(Listing::Payments, window).await
    }

    async fn fetch_refunds(&self, window: &Window) -> Result<Vec<Transaction>> {
        self.list(Listing::Refunds, window).await
    }
}
