//! Shared test helpers for `tillstat-core` integration tests.
//!
//! Lightweight test doubles for the scrape ports so tests can focus on
//! behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod sources;

pub use sources::{FailingSource, FixedClock, StaticSource};
