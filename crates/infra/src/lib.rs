//! # tillstat Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - HTTP client wrapper around `reqwest`
//! - Square API client implementing `TransactionSource`
//! - Configuration loading from environment variables or files
//! - The Prometheus registry holding the exported gauges
//!
//! ## Architecture
//! - Implements traits defined in `tillstat-core`
//! - Depends on `tillstat-domain` and `tillstat-core`
//! - Contains all "impure" code (I/O, network)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod observability;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::square::SquareClient;
pub use observability::ExporterMetrics;
