//! Square Connect API integration
//!
//! `SquareClient` lists payments and refunds for one location over a time
//! window and implements [`tillstat_core::TransactionSource`] so the scrape
//! service can use it directly.
//!
//! # Endpoints
//!
//! - `GET /v2/payments` and `GET /v2/refunds`, filtered by `begin_time`,
//!   `end_time` and `location_id`, sorted ascending, 100 records per page
//! - `GET /v2/locations/{id}` for the location's currency
//!
//! Every page of a listing is requested once. Any failed request fails the
//! whole listing.
//!
//! # Usage
//!
//! ```no_run
//! use tillstat_core::TransactionSource;
//! use tillstat_domain::{SquareConfig, Window};
//! use tillstat_infra::integrations::square::SquareClient;
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SquareConfig::new(std::env::var("SQUARE_ACCESS_TOKEN")?, "L8QWZ");
//! let client = SquareClient::new(&config)?;
//!
//! let window = Window::trailing(chrono::Utc::now(), 24)?;
//! let payments = client.fetch_payments(&window).await?;
//! println!("{} payments in the last 24h", payments.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod types;

pub use client::SquareClient;
