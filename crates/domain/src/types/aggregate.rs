//! Per-scrape aggregate values

use serde::{Deserialize, Serialize};

use super::window::Window;

/// Count, sum and mean of one category of transactions.
///
/// Recomputed from scratch on every scrape; it has no identity beyond the
/// request that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub count: u64,
    /// Sum of amounts in minor currency units.
    pub total_value: i64,
    /// `total_value / count`, or `0.0` when `count` is zero.
    pub avg_value: f64,
}

impl Aggregate {
    /// Aggregate with no records.
    pub const fn zero() -> Self {
        Self { count: 0, total_value: 0, avg_value: 0.0 }
    }

    /// Build an aggregate from a count and total, deriving the average.
    pub fn from_totals(count: u64, total_value: i64) -> Self {
        let avg_value = if count == 0 { 0.0 } else { total_value as f64 / count as f64 };
        Self { count, total_value, avg_value }
    }
}

impl Default for Aggregate {
    fn default() -> Self {
        Self::zero()
    }
}

/// Result of one successful scrape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeSnapshot {
    pub window: Window,
    pub payments: Aggregate,
    pub refunds: Aggregate,
    /// Currency code used to annotate logs; does not affect values.
    pub currency: Option<String>,
}
