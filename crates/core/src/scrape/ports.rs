//! Port interfaces for scraping
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tillstat_domain::{Result, Transaction, Window};

/// Read-only source of payment and refund records for one location
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Fetch every payment created within the window
    async fn fetch_payments(&self, window: &Window) -> Result<Vec<Transaction>>;

    /// Fetch every refund created within the window
    async fn fetch_refunds(&self, window: &Window) -> Result<Vec<Transaction>>;
}

/// Wall clock used to derive the look-back window
pub trait Clock: Send + Sync {
    /// Current UTC time
    fn now(&self) -> DateTime<Utc>;
}

/// Real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
