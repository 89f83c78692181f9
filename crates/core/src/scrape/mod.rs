//! Scrape orchestration
//!
//! One scrape = compute the window, fetch payments and refunds, aggregate.

pub mod ports;
pub mod service;

pub use service::ScrapeService;
