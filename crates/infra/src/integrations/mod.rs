//! External service integrations

pub mod square;
