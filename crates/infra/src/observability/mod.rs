//! Observability infrastructure for the exported metrics
//!
//! The exporter keeps every metric in its own `prometheus::Registry` owned by
//! [`ExporterMetrics`]; nothing is registered in the process-global default
//! registry. The registry is shared with the HTTP layer through an `Arc` and
//! updated once per scrape.
//!
//! Concurrent scrapes publish under one lock that `render` also takes, so the
//! exposition never mixes gauges from two scrapes. The last write wins.

mod exporter;

pub use exporter::{ExporterMetrics, TEXT_CONTENT_TYPE};
