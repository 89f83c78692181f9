//! # tillstat Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the transaction source and the clock
//! - The aggregator that reduces records to counts, sums and averages
//! - The scrape service that ties a window, a source and the aggregator
//!   together
//!
//! ## Architecture Principles
//! - Only depends on `tillstat-domain`
//! - No HTTP, metrics registry or platform code
//! - All external dependencies via traits

pub mod aggregation;
pub mod scrape;

pub use aggregation::{aggregate, resolve_currency};
pub use scrape::ports::{Clock, SystemClock, TransactionSource};
pub use scrape::ScrapeService;
