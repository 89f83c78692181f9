//! Scrape service - core business logic

use std::sync::Arc;

use tillstat_domain::{Result, ScrapeSnapshot, Transaction, Window};
use tracing::{debug, info};

use super::ports::{Clock, SystemClock, TransactionSource};
use crate::aggregation::{aggregate, resolve_currency};

/// Fetches and aggregates one snapshot per call
pub struct ScrapeService {
    source: Arc<dyn TransactionSource>,
    clock: Arc<dyn Clock>,
    window_hours: u32,
    default_currency: Option<String>,
}

impl ScrapeService {
    /// Create a new scrape service using the system clock
    pub fn new(source: Arc<dyn TransactionSource>, window_hours: u32) -> Self {
        Self { source, clock: Arc::new(SystemClock), window_hours, default_currency: None }
    }

    /// Replace the clock (tests pin "now" with this)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Currency reported when no record carries one
    pub fn with_default_currency(mut self, currency: Option<String>) -> Self {
        self.default_currency = currency;
        self
    }

    /// Window a scrape started now would cover
    pub fn current_window(&self) -> Result<Window> {
        Window::trailing(self.clock.now(), self.window_hours)
    }

    /// Run one scrape: fetch payments, then refunds, then aggregate.
    ///
    /// Records outside the window are ignored even if the source returns
    /// them. Any source error fails the whole scrape; no partial snapshot is
    /// produced.
    pub async fn collect(&self) -> Result<ScrapeSnapshot> {
        let window = self.current_window()?;
        debug!(begin = %window.begin_time(), end = %window.end_time(), "collecting transactions");

        let payments = within(&window, self.source.fetch_payments(&window).await?);
        let refunds = within(&window, self.source.fetch_refunds(&window).await?);

        let currency = resolve_currency(&payments, &refunds, self.default_currency.as_deref());
        let snapshot = ScrapeSnapshot {
            window,
            payments: aggregate(&payments),
            refunds: aggregate(&refunds),
            currency,
        };

        info!(
            payments = snapshot.payments.count,
            total_value = snapshot.payments.total_value,
            avg_value = snapshot.payments.avg_value,
            refunds = snapshot.refunds.count,
            refund_value = snapshot.refunds.total_value,
            currency = snapshot.currency.as_deref().unwrap_or("minor units"),
            "metrics collected"
        );

        Ok(snapshot)
    }
}

fn within(window: &Window, records: Vec<Transaction>) -> Vec<Transaction> {
    let fetched = records.len();
    let kept: Vec<_> = records.into_iter().filter(|r| window.contains(r.created_at)).collect();
    if kept.len() != fetched {
        debug!(dropped = fetched - kept.len(), "ignored records outside the window");
    }
    kept
}
