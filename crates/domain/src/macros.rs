//! Macro for implementing Display and FromStr for unit enums
//!
//! Configuration values and record kinds travel as lowercase strings
//! (environment variables, log fields, metric labels). This macro keeps the
//! enum ⇄ string mapping in one place.
//!
//! # Example
//!
//! ```rust
//! use tillstat_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Channel {
//!     Online,
//!     InPerson,
//! }
//!
//! impl_domain_status_conversions!(Channel {
//!     Online => "online",
//!     InPerson => "in_person",
//! });
//! ```

/// Implements Display and FromStr traits for unit enums
///
/// This macro generates:
/// - Display trait: converts enum variants to their mapped strings
/// - FromStr trait: parses case-insensitive strings to enum variants
///
/// Mapped strings must be lowercase for parsing to round-trip.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
