//! Infrastructure error handling
//!
//! External error types are converted into `TillstatError` here so the
//! domain crate never depends on `reqwest` or `prometheus`.

mod conversions;

pub use conversions::InfraError;
