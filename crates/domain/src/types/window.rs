//! Look-back window

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TillstatError};

/// Closed time range `[start, end]` that records are aggregated over.
///
/// Both ends are inclusive. The window is derived from "now" on every scrape
/// and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    /// Window covering the `hours` leading up to `now`.
    ///
    /// # Errors
    /// Returns `TillstatError::Config` when `hours` is zero or the start
    /// would fall outside the representable date range.
    pub fn trailing(now: DateTime<Utc>, hours: u32) -> Result<Self> {
        if hours == 0 {
            return Err(TillstatError::Config("look-back window must be at least 1 hour".into()));
        }
        let start = now.checked_sub_signed(Duration::hours(i64::from(hours))).ok_or_else(|| {
            TillstatError::Config(format!("look-back window of {hours} hours is out of range"))
        })?;
        Ok(Self { start, end: now })
    }

    /// Whether `at` falls inside the window (inclusive on both ends).
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    /// Window length.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Start formatted as RFC 3339 with a `Z` suffix, as the Square API expects.
    pub fn begin_time(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// End formatted as RFC 3339 with a `Z` suffix.
    pub fn end_time(&self) -> String {
        self.end.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
