//! Transaction records as seen by the exporter
//!
//! These are read-only views of upstream payments and refunds. The exporter
//! never creates or mutates them; it only counts and sums them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Category a transaction is aggregated under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Payment,
    Refund,
}

impl_domain_status_conversions!(TransactionKind {
    Payment => "payment",
    Refund => "refund",
});

/// A single payment or refund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    /// Amount in minor currency units (e.g. cents).
    pub amount: i64,
    /// ISO 4217 currency code (`USD`, `GBP`, ...).
    pub currency: String,
    pub created_at: DateTime<Utc>,
    /// Upstream status string (`COMPLETED`, `PENDING`, ...), kept verbatim.
    pub status: String,
}

impl Transaction {
    /// Convenience constructor for a payment record.
    pub fn payment(
        id: impl Into<String>,
        amount: i64,
        currency: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: TransactionKind::Payment,
            amount,
            currency: currency.into(),
            created_at,
            status: "COMPLETED".to_string(),
        }
    }

    /// Convenience constructor for a refund record.
    pub fn refund(
        id: impl Into<String>,
        amount: i64,
        currency: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: TransactionKind::Refund,
            amount,
            currency: currency.into(),
            created_at,
            status: "COMPLETED".to_string(),
        }
    }

    /// Override the upstream status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}
