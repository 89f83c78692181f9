//! In-memory implementations of the scrape ports

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tillstat_core::{Clock, TransactionSource};
use tillstat_domain::{Result as DomainResult, TillstatError, Transaction, Window};

/// Source seeded with a fixed set of payments and refunds.
///
/// Returns the seeded records unfiltered, so tests can check that the
/// service applies the window itself.
#[derive(Default, Clone)]
pub struct StaticSource {
    payments: Arc<Vec<Transaction>>,
    refunds: Arc<Vec<Transaction>>,
    calls: Arc<AtomicUsize>,
}

impl StaticSource {
    pub fn new(payments: Vec<Transaction>, refunds: Vec<Transaction>) -> Self {
        Self { payments: Arc::new(payments), refunds: Arc::new(refunds), calls: Arc::default() }
    }

    /// Number of fetch calls served so far (payments + refunds).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionSource for StaticSource {
    async fn fetch_payments(&self, _window: &Window) -> DomainResult<Vec<Transaction>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.payments.as_ref().clone())
    }

    async fn fetch_refunds(&self, _window: &Window) -> DomainResult<Vec<Transaction>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.refunds.as_ref().clone())
    }
}

/// Source whose payments or refunds call fails with a fixed error.
pub struct FailingSource {
    pub error: TillstatError,
    pub fail_refunds_only: bool,
}

impl FailingSource {
    pub fn on_payments(error: TillstatError) -> Self {
        Self { error, fail_refunds_only: false }
    }

    pub fn on_refunds(error: TillstatError) -> Self {
        Self { error, fail_refunds_only: true }
    }
}

#[async_trait]
impl TransactionSource for FailingSource {
    async fn fetch_payments(&self, _window: &Window) -> DomainResult<Vec<Transaction>> {
        if self.fail_refunds_only {
            Ok(Vec::new())
        } else {
            Err(self.error.clone())
        }
    }

    async fn fetch_refunds(&self, _window: &Window) -> DomainResult<Vec<Transaction>> {
        Err(self.error.clone())
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
