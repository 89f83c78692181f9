//! # tillstat Domain
//!
//! Business domain types for the Square payments exporter.
//!
//! This crate contains:
//! - Transaction records, the look-back window and aggregate values
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants (metric names, API defaults)
//!
//! ## Architecture
//! - No dependencies on other tillstat crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
