/// Square API wire types
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tillstat_domain::{Result, TillstatError, Transaction, TransactionKind};

/// Which listing endpoint a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Payments,
    Refunds,
}

impl Listing {
    pub fn path(self) -> &'static str {
        match self {
            Self::Payments => "payments",
            Self::Refunds => "refunds",
        }
    }

    pub fn kind(self) -> TransactionKind {
        match self {
            Self::Payments => TransactionKind::Payment,
            Self::Refunds => TransactionKind::Refund,
        }
    }
}

/// One page of `ListPayments` or `ListRefunds`
///
/// Square omits the record key entirely when a page is empty, and omits
/// `cursor` on the last page.
#[derive(Debug, Default, Deserialize)]
pub struct ListPage {
    #[serde(default)]
    pub payments: Vec<WireRecord>,
    #[serde(default)]
    pub refunds: Vec<WireRecord>,
    #[serde(default)]
    pub cursor: Option<String>,
}

impl ListPage {
    /// Take the records for `listing` and the cursor of the next page.
    pub fn into_parts(self, listing: Listing) -> (Vec<WireRecord>, Option<String>) {
        let records = match listing {
            Listing::Payments => self.payments,
            Listing::Refunds => self.refunds,
        };
        (records, self.cursor.filter(|cursor| !cursor.is_empty()))
    }
}

/// Payment or refund as returned by Square
#[derive(Debug, Clone, Deserialize)]
pub struct WireRecord {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub amount_money: Option<Money>,
}

/// Amount in the smallest denomination of `currency`
#[derive(Debug, Clone, Deserialize)]
pub struct Money {
    pub amount: i64,
    #[serde(default)]
    pub currency: Option<String>,
}

impl WireRecord {
    /// Convert into a domain transaction.
    ///
    /// # Errors
    /// Returns `TillstatError::InvalidResponse` if the record has no
    /// `amount_money`.
    pub fn into_transaction(self, kind: TransactionKind) -> Result<Transaction> {
        let money = self.amount_money.ok_or_else(|| {
            TillstatError::InvalidResponse(format!("{kind} {} has no amount_money", self.id))
        })?;

        Ok(Transaction {
            id: self.id,
            kind,
            amount: money.amount,
            currency: money.currency.unwrap_or_default(),
            created_at: self.created_at,
            status: self.status.unwrap_or_default(),
        })
    }
}

/// Error body Square returns with non-2xx responses
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorBody {
    /// Most specific message in the body: the first `detail`, else the first
    /// `code`.
    pub fn first_message(&self) -> Option<String> {
        let first = self.errors.first()?;
        first.detail.clone().or_else(|| first.code.clone())
    }
}

/// `RetrieveLocation` response
#[derive(Debug, Default, Deserialize)]
pub struct LocationResponse {
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}
