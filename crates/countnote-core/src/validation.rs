//! # Validation Module
//!
//! Input validation utilities for Count Note.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end (CLI flags, text fields)                           │
//! │  └── Shape checks, confirmation prompts                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Denomination keys, notes, snapshot ids                            │
//! │  └── Count bounds                                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: CountStore                                                   │
//! │  └── Denomination must belong to the active table                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::MINOR_UNITS_PER_MAJOR;
use crate::types::{DenominationValue, HistorySnapshot};
use crate::{MAX_COUNT, MAX_NOTE_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Denomination Keys
// =============================================================================

/// Parses a denomination such as `500`, `0.25` or `0.1`.
///
/// ## Rules
/// - Digits with at most one decimal point
/// - At most two fraction digits (values are stored in minor units)
/// - Must be greater than zero
///
/// ## Example
/// ```rust
/// use countnote_core::validation::parse_denomination_value;
///
/// assert_eq!(parse_denomination_value("0.1").unwrap().minor_units(), 10);
/// assert_eq!(parse_denomination_value("500").unwrap().minor_units(), 50_000);
/// assert!(parse_denomination_value("0.001").is_err());
/// assert!(parse_denomination_value("0").is_err());
/// ```
pub fn parse_denomination_value(raw: &str) -> ValidationResult<DenominationValue> {
    let raw = raw.trim();
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "denomination".to_string(),
        reason: reason.to_string(),
    };

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: "denomination".to_string(),
        });
    }

    let (whole, fraction) = match raw.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (raw, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("must contain digits"));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid("must be a decimal number"));
    }
    if fraction.len() > 2 {
        return Err(invalid("at most two decimal places"));
    }

    let major: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid("value is too large"))?
    };
    let minor: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid("bad fraction"))? * 10,
        _ => fraction.parse().map_err(|_| invalid("bad fraction"))?,
    };

    let total = major
        .checked_mul(MINOR_UNITS_PER_MAJOR)
        .and_then(|m| m.checked_add(minor))
        .ok_or_else(|| invalid("value is too large"))?;

    if total <= 0 {
        return Err(invalid("must be greater than zero"));
    }

    Ok(DenominationValue::from_minor(total))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a count before it is stored.
///
/// ## Rules
/// - Must not exceed [`MAX_COUNT`]
/// - Negative counts are unrepresentable (`u64`)
pub fn validate_count(count: u64) -> ValidationResult<()> {
    if count > MAX_COUNT {
        return Err(ValidationError::OutOfRange {
            field: "count".to_string(),
            min: 0,
            max: MAX_COUNT,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Normalizes an optional snapshot note.
///
/// ## Returns
/// - `None` for missing or whitespace-only notes
/// - The trimmed note otherwise
pub fn validate_note(note: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(note) = note.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    if note.chars().count() > MAX_NOTE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "note".to_string(),
            max: MAX_NOTE_LENGTH,
        });
    }

    Ok(Some(note.to_string()))
}

/// Validates a snapshot id (UUID format) and returns it trimmed.
///
/// Lookups must use the returned id, not the raw input.
///
/// ## Example
/// ```rust
/// use countnote_core::validation::validate_snapshot_id;
///
/// let id = validate_snapshot_id(" 550e8400-e29b-41d4-a716-446655440000 ").unwrap();
/// assert_eq!(id, "550e8400-e29b-41d4-a716-446655440000");
/// assert!(validate_snapshot_id("not-a-uuid").is_err());
/// ```
pub fn validate_snapshot_id(id: &str) -> ValidationResult<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(id)
}

// =============================================================================
// Snapshot Validators
// =============================================================================

/// Checks a snapshot read back from storage before anything folds it.
///
/// ## Rules
/// - Every denomination belongs to the snapshot's currency
/// - Every count is within [`MAX_COUNT`]
pub fn validate_snapshot(snapshot: &HistorySnapshot) -> ValidationResult<()> {
    let table = snapshot.currency.table();
    for (value, count) in snapshot.denomination_counts.iter() {
        if !table.contains(value) {
            return Err(ValidationError::InvalidFormat {
                field: "denominationCounts".to_string(),
                reason: format!("{} is not a {} denomination", value, snapshot.currency),
            });
        }
        validate_count(count)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
