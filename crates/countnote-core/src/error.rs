//! # Error Types
//!
//! Domain-specific error types for countnote-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  countnote-core errors (this file)                                     │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  ├── ExpressionError  - Arithmetic parse/evaluation failures           │
//! │  └── StorageError     - KeyValueStore failures                         │
//! │                                                                         │
//! │  countnote-db errors (separate crate)                                  │
//! │  └── DbError          - SQLite failures, mapped into StorageError      │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── AppError         - What the terminal user sees                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Never Becomes an Error
//! A malformed count expression, a non-numeric entry, or a decrement at zero
//! are all absorbed by the counting pipeline: the previous count is kept.
//! `ExpressionError` only escapes through [`crate::expression::parse_arithmetic`]
//! and [`crate::expression::parse_calculation`], which the calculator uses
//! to show "Error".

use thiserror::Error;

use crate::types::Currency;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The denomination is not part of the active currency's table.
    ///
    /// ## When This Occurs
    /// - Caller passes `0.25` while INR is active
    /// - A stale UI still shows the other currency's denominations
    #[error("{value} is not a {currency} denomination")]
    UnknownDenomination { currency: Currency, value: String },

    /// A count exceeded the allowed maximum.
    #[error("Count {requested} exceeds maximum allowed ({max})")]
    CountTooLarge { requested: u64, max: u64 },

    /// Currency code is not supported.
    #[error("Unsupported currency: {0}")]
    UnknownCurrency(String),

    /// History snapshot cannot be found.
    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(String),

    /// A snapshot belongs to a different currency than the active one.
    #[error("Snapshot {id} was counted in {snapshot}, active currency is {active}")]
    CurrencyMismatch {
        id: String,
        snapshot: Currency,
        active: Currency,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Expression error (wraps ExpressionError).
    #[error("Expression error: {0}")]
    Expression(#[from] ExpressionError),

    /// Storage error (wraps StorageError).
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: u64, max: u64 },

    /// Invalid format (e.g., invalid UUID, invalid denomination key).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Expression Error
// =============================================================================

/// Failures of the restricted arithmetic grammar.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    /// Input was empty after whitespace removal.
    #[error("Expression is empty")]
    Empty,

    /// A character outside `0-9 . + - * / ( )`.
    #[error("Unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },

    /// A numeric literal such as `1.2.3` or a lone `.`.
    #[error("Malformed number '{0}'")]
    MalformedNumber(String),

    /// Grammar violation (dangling operator, unbalanced parentheses, ...).
    #[error("Syntax error at position {position}: {reason}")]
    Syntax { position: usize, reason: String },

    /// Division or remainder by zero, or overflow to infinity.
    #[error("Result is not a finite number")]
    NonFinite,
}

// =============================================================================
// Storage Error
// =============================================================================

/// Errors raised by a [`crate::storage::KeyValueStore`] implementation.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store rejected the operation (disk full, closed pool, ...).
    #[error("Storage backend failed: {0}")]
    Backend(String),

    /// Stored JSON could not be encoded or decoded.
    #[error("Stored value is not valid JSON for {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::UnknownDenomination {
            currency: Currency::Inr,
            value: "0.25".to_string(),
        };
        assert_eq!(err.to_string(), "0.25 is not a INR denomination");

        let err = CoreError::CountTooLarge {
            requested: 5_000_000_000,
            max: 999_999_999,
        };
        assert_eq!(
            err.to_string(),
            "Count 5000000000 exceeds maximum allowed (999999999)"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "note".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_expression_error_messages() {
        let err = ExpressionError::UnexpectedChar {
            ch: 'a',
            position: 2,
        };
        assert_eq!(err.to_string(), "Unexpected character 'a' at position 2");
        assert_eq!(
            ExpressionError::NonFinite.to_string(),
            "Result is not a finite number"
        );
    }
}
