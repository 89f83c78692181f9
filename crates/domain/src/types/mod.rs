//! Domain types and models
//!
//! Records fetched from the payments API, the look-back window they are
//! filtered by, and the per-scrape aggregates derived from them.

pub mod aggregate;
pub mod transaction;
pub mod window;

pub use aggregate::{Aggregate, ScrapeSnapshot};
pub use transaction::{Transaction, TransactionKind};
pub use window::Window;
