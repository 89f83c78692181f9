//! # tillstat API
//!
//! HTTP layer of the exporter - router, handlers and entry point wiring.
//!
//! This crate contains:
//! - The axum router serving `/metrics` and `/health`
//! - Application context (dependency injection)
//! - Logging initialization
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires the Square client into the scrape service
//! - Runs one scrape per `/metrics` request

pub mod context;
pub mod handlers;
pub mod router;
pub mod utils;

// Re-export for convenience
pub use context::AppContext;
pub use router::create_router;
