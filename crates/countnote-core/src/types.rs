//! # Domain Types
//!
//! Core domain types used throughout Count Note.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Currency     │   │  Denomination   │   │   CountState    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  INR            │   │  value (minor)  │   │  value → count  │       │
//! │  │  USD            │   │  kind           │   │  (one currency) │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Totals      │   │ HistorySnapshot │   │CalculationRecord│       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  total_amount   │   │  id, timestamp  │   │  expression     │       │
//! │  │  total_count    │   │  totals, counts │   │  result         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Exact Denomination Values
//! Denomination values are rational (USD has 0.25, 0.10, ...). They are held
//! as integer minor units (1/100 of the major unit) so `value × count` sums
//! are exact. On the wire they are written the way a JavaScript number prints:
//! `500`, `0.25`, `0.1`, `0.05`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::denomination::DenominationTable;
use crate::error::{CoreError, ValidationError};
use crate::money::{Amount, MINOR_UNITS_PER_MAJOR};

// =============================================================================
// Currency
// =============================================================================

/// Supported currencies. Each has its own fixed denomination table and its
/// own independently persisted count state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Currency {
    /// Indian rupee.
    #[serde(rename = "INR")]
    Inr,
    /// US dollar.
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    /// Every supported currency, in display order.
    pub const ALL: [Currency; 2] = [Currency::Inr, Currency::Usd];

    /// ISO 4217 code, also used to namespace storage keys.
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
        }
    }

    /// Display symbol.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Currency::Inr => "₹",
            Currency::Usd => "$",
        }
    }

    /// Minimum fraction digits shown when formatting amounts.
    pub const fn min_fraction_digits(&self) -> usize {
        match self {
            Currency::Inr => 0,
            Currency::Usd => 2,
        }
    }

    /// The fixed denomination table for this currency.
    pub fn table(&self) -> &'static DenominationTable {
        DenominationTable::for_currency(*self)
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Inr
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INR" => Ok(Currency::Inr),
            "USD" => Ok(Currency::Usd),
            other => Err(CoreError::UnknownCurrency(other.to_string())),
        }
    }
}

// =============================================================================
// Denomination
// =============================================================================

/// Whether a denomination is printed on paper or minted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum DenominationKind {
    Note,
    Coin,
}

impl fmt::Display for DenominationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenominationKind::Note => write!(f, "note"),
            DenominationKind::Coin => write!(f, "coin"),
        }
    }
}

/// Face value of a note or coin, in minor units.
///
/// ## Example
/// ```rust
/// use countnote_core::DenominationValue;
///
/// let quarter: DenominationValue = "0.25".parse().unwrap();
/// assert_eq!(quarter.minor_units(), 25);
/// assert_eq!(quarter.to_string(), "0.25");
///
/// let dime = DenominationValue::from_minor(10);
/// assert_eq!(dime.to_string(), "0.1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DenominationValue(i64);

impl DenominationValue {
    /// Creates a value from minor units (100 = one major unit).
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        DenominationValue(minor)
    }

    /// Creates a value from whole major units.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        DenominationValue(major * MINOR_UNITS_PER_MAJOR)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// Returns the value as an [`Amount`].
    #[inline]
    pub const fn amount(&self) -> Amount {
        Amount::from_minor(self.0)
    }

    /// Value of `count` items of this denomination. Saturates instead of
    /// overflowing.
    #[inline]
    pub const fn times(&self, count: u64) -> Amount {
        let count = if count > i64::MAX as u64 {
            i64::MAX
        } else {
            count as i64
        };
        Amount::from_minor(self.0.saturating_mul(count))
    }
}

/// Prints the value the way a JavaScript number prints: no trailing zeros.
impl fmt::Display for DenominationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let major = self.0 / MINOR_UNITS_PER_MAJOR;
        let minor = self.0 % MINOR_UNITS_PER_MAJOR;
        if minor == 0 {
            write!(f, "{}", major)
        } else if minor % 10 == 0 {
            write!(f, "{}.{}", major, minor / 10)
        } else {
            write!(f, "{}.{:02}", major, minor)
        }
    }
}

impl FromStr for DenominationValue {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::validation::parse_denomination_value(s)
    }
}

impl TryFrom<String> for DenominationValue {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DenominationValue> for String {
    fn from(value: DenominationValue) -> Self {
        value.to_string()
    }
}

/// A single entry of a currency's denomination table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denomination {
    pub value: DenominationValue,
    pub kind: DenominationKind,
}

impl Denomination {
    /// Creates a note worth `major` whole units.
    pub const fn note(major: i64) -> Self {
        Denomination {
            value: DenominationValue::from_major(major),
            kind: DenominationKind::Note,
        }
    }

    /// Creates a coin worth `minor` minor units.
    pub const fn coin(minor: i64) -> Self {
        Denomination {
            value: DenominationValue::from_minor(minor),
            kind: DenominationKind::Coin,
        }
    }
}

// =============================================================================
// Count State
// =============================================================================

/// Mapping from denomination value to a non-negative count, for one currency.
///
/// Serialized as a JSON object keyed by the denomination string:
/// `{"500": 5, "0.25": 3}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountState(BTreeMap<DenominationValue, u64>);

impl CountState {
    /// Creates an empty state.
    pub fn new() -> Self {
        CountState(BTreeMap::new())
    }

    /// Creates a state with every denomination of `table` at zero.
    pub fn zeroed(table: &DenominationTable) -> Self {
        CountState(table.values().map(|v| (v, 0)).collect())
    }

    /// Count for `value`; absent entries read as zero.
    pub fn get(&self, value: DenominationValue) -> u64 {
        self.0.get(&value).copied().unwrap_or(0)
    }

    /// Sets a count. Only CountStore calls this on live state.
    pub(crate) fn insert(&mut self, value: DenominationValue, count: u64) {
        self.0.insert(value, count);
    }

    /// Iterates entries in ascending denomination order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (DenominationValue, u64)> + '_ {
        self.0.iter().map(|(v, c)| (*v, *c))
    }

    /// Number of stored entries (including zeros).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Σ value × count. Saturates on counts no store would accept.
    pub fn total_amount(&self) -> Amount {
        let minor = self.iter().fold(0i64, |sum, (value, count)| {
            sum.saturating_add(value.times(count).minor_units())
        });
        Amount::from_minor(minor)
    }

    /// Σ count.
    pub fn total_count(&self) -> u64 {
        self.0.values().fold(0u64, |sum, count| sum.saturating_add(*count))
    }

    /// Both aggregates, folded from the entries.
    pub fn totals(&self) -> Totals {
        Totals {
            total_amount: self.total_amount(),
            total_count: self.total_count(),
        }
    }

    /// Non-zero entries, largest denomination first.
    pub fn nonzero_descending(&self) -> Vec<(DenominationValue, u64)> {
        self.iter().rev().filter(|(_, count)| *count > 0).collect()
    }
}

impl FromIterator<(DenominationValue, u64)> for CountState {
    fn from_iter<I: IntoIterator<Item = (DenominationValue, u64)>>(iter: I) -> Self {
        CountState(iter.into_iter().collect())
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Aggregates derived from a [`CountState`]. Never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    #[ts(type = "number")]
    pub total_amount: Amount,
    #[ts(type = "number")]
    pub total_count: u64,
}

// =============================================================================
// History Snapshot
// =============================================================================

/// An immutable copy of a counting session at the moment it was saved.
///
/// ## Snapshot Pattern
/// The totals are frozen alongside the counts they were computed from, so an
/// archived entry stays self-consistent even if denomination tables change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HistorySnapshot {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// When the snapshot was taken.
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,

    /// Σ value × count, in minor units.
    #[ts(type = "number")]
    pub total_amount: Amount,

    /// Σ count.
    #[ts(type = "number")]
    pub total_count: u64,

    /// Full copy of the counts.
    #[ts(type = "Record<string, number>")]
    pub denomination_counts: CountState,

    /// Currency the counts belong to.
    pub currency: Currency,

    /// Optional user note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl HistorySnapshot {
    /// Captures `counts` with totals folded from the same data.
    pub fn capture(currency: Currency, counts: CountState, note: Option<String>) -> Self {
        let totals = counts.totals();
        HistorySnapshot {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            total_amount: totals.total_amount,
            total_count: totals.total_count,
            denomination_counts: counts,
            currency,
            note,
        }
    }

    /// Frozen totals.
    pub fn totals(&self) -> Totals {
        Totals {
            total_amount: self.total_amount,
            total_count: self.total_count,
        }
    }

    /// True when the frozen totals match the frozen counts.
    pub fn is_consistent(&self) -> bool {
        self.totals() == self.denomination_counts.totals()
    }
}

// =============================================================================
// Calculation Record
// =============================================================================

/// One evaluated line of the embedded calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRecord {
    /// Expression as the user typed it.
    pub expression: String,
    /// Result rendered for display.
    pub result: String,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_parsing() {
        assert_eq!("INR".parse::<Currency>().unwrap(), Currency::Inr);
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert!("EUR".parse::<Currency>().is_err());
        assert_eq!(Currency::default(), Currency::Inr);
    }

    #[test]
    fn test_currency_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Currency::Usd).unwrap(), "\"USD\"");
    }

    #[test]
    fn test_denomination_value_display() {
        assert_eq!(DenominationValue::from_major(500).to_string(), "500");
        assert_eq!(DenominationValue::from_minor(25).to_string(), "0.25");
        assert_eq!(DenominationValue::from_minor(10).to_string(), "0.1");
        assert_eq!(DenominationValue::from_minor(5).to_string(), "0.05");
        assert_eq!(DenominationValue::from_minor(1).to_string(), "0.01");
    }

    #[test]
    fn test_count_state_json_layout() {
        let state: CountState = [
            (DenominationValue::from_major(500), 5),
            (DenominationValue::from_minor(25), 3),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"0.25":3,"500":5}"#);

        let parsed: CountState = serde_json::from_str(r#"{"500":5,"0.25":3}"#).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn test_count_state_rejects_negative_counts() {
        let parsed = serde_json::from_str::<CountState>(r#"{"500":-1}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_count_state_totals() {
        let state: CountState = [
            (DenominationValue::from_major(500), 7),
            (DenominationValue::from_major(2), 3),
        ]
        .into_iter()
        .collect();

        assert_eq!(state.total_amount(), Amount::from_major(3506));
        assert_eq!(state.total_count(), 10);
        assert_eq!(
            state.nonzero_descending(),
            vec![
                (DenominationValue::from_major(500), 7),
                (DenominationValue::from_major(2), 3)
            ]
        );
    }

    #[test]
    fn test_snapshot_capture_is_consistent() {
        let state: CountState = [(DenominationValue::from_major(100), 4)].into_iter().collect();
        let snapshot = HistorySnapshot::capture(Currency::Usd, state, Some("till".into()));

        assert!(snapshot.is_consistent());
        assert_eq!(snapshot.total_count, 4);
        assert_eq!(snapshot.total_amount, Amount::from_major(400));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["currency"], "USD");
        assert_eq!(json["denominationCounts"]["100"], 4);
        assert_eq!(json["note"], "till");
    }

    #[test]
    fn test_totals_saturate_on_huge_counts() {
        let state: CountState = [
            (DenominationValue::from_major(500), u64::MAX / 2),
            (DenominationValue::from_major(200), u64::MAX / 2),
        ]
        .into_iter()
        .collect();

        assert_eq!(state.total_amount().minor_units(), i64::MAX);
        assert_eq!(state.total_count(), u64::MAX - 1);
        assert_eq!(
            DenominationValue::from_major(500).times(u64::MAX),
            Amount::from_minor(i64::MAX)
        );
    }
}
