//! Aggregation of transaction records
//!
//! Amounts are assumed to share one currency per location, so aggregation
//! never converts or groups by currency.

use tillstat_domain::{Aggregate, Transaction};

/// Reduce records to count, total value and average value.
///
/// The total saturates at the `i64` bounds instead of overflowing.
pub fn aggregate(records: &[Transaction]) -> Aggregate {
    let total = records.iter().fold(0i64, |acc, record| acc.saturating_add(record.amount));
    Aggregate::from_totals(records.len() as u64, total)
}

/// Currency of the first available record, preferring payments, else the
/// fallback.
pub fn resolve_currency(
    payments: &[Transaction],
    refunds: &[Transaction],
    fallback: Option<&str>,
) -> Option<String> {
    payments
        .iter()
        .chain(refunds.iter())
        .map(|record| record.currency.trim())
        .find(|currency| !currency.is_empty())
        .or(fallback)
        .map(str::to_string)
}
