//! Application constants
//!
//! Centralized location for the defaults and metric names used throughout the
//! exporter.

// Server defaults
pub const DEFAULT_EXPORTER_PORT: u16 = 8000;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

// Scrape defaults
pub const DEFAULT_WINDOW_HOURS: u32 = 24;
pub const MAX_WINDOW_HOURS: u32 = 24 * 366;

// Square API defaults
pub const SQUARE_API_BASE: &str = "https://connect.squareup.com";
pub const SQUARE_API_VERSION: &str = "2023-07-20";
pub const SQUARE_PAGE_LIMIT: u32 = 100;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Exposition metric names
pub const METRIC_PAYMENTS_COUNT: &str = "square_payments_count_24h";
pub const METRIC_PAYMENTS_VALUE: &str = "square_payments_value_24h";
pub const METRIC_PAYMENTS_AVG_VALUE: &str = "square_payments_avg_value_24h";
pub const METRIC_REFUNDS_COUNT: &str = "square_refunds_count_24h";
pub const METRIC_REFUNDS_VALUE: &str = "square_refunds_value_24h";

// Exporter self-metrics
pub const METRIC_SCRAPE_SUCCESS: &str = "square_exporter_scrape_success";
pub const METRIC_SCRAPE_DURATION: &str = "square_exporter_scrape_duration_seconds";
pub const METRIC_LAST_SUCCESS_TIMESTAMP: &str = "square_exporter_last_success_timestamp_seconds";
pub const METRIC_SCRAPE_ERRORS: &str = "square_exporter_scrape_errors_total";
