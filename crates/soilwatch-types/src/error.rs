//! Error types for user-supplied values in soilwatch-types.

use thiserror::Error;

/// Errors that can occur when parsing user-entered filter values.
///
/// Feed data is never rejected with these errors; lenient deserialization
/// in [`crate::reading`] degrades bad fields to `None` instead. This type
/// exists for values the user types in (explicit date bounds).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A date string did not match the expected `YYYY-MM-DD` shape.
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Result type alias using soilwatch-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
