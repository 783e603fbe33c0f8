//! # Denomination Tables
//!
//! Fixed, per-currency lists of notes and coins, largest first.
//!
//! ```text
//! INR: 500 200 100 50 20 10 5 (notes)   2 1 (coins)
//! USD: 100 50 20 10 5 1 (notes)         0.25 0.10 0.05 0.01 (coins)
//! ```

use crate::types::{Currency, Denomination, DenominationValue};

static INR_DENOMINATIONS: [Denomination; 9] = [
    Denomination::note(500),
    Denomination::note(200),
    Denomination::note(100),
    Denomination::note(50),
    Denomination::note(20),
    Denomination::note(10),
    Denomination::note(5),
    Denomination::coin(200),
    Denomination::coin(100),
];

static USD_DENOMINATIONS: [Denomination; 10] = [
    Denomination::note(100),
    Denomination::note(50),
    Denomination::note(20),
    Denomination::note(10),
    Denomination::note(5),
    Denomination::note(1),
    Denomination::coin(25),
    Denomination::coin(10),
    Denomination::coin(5),
    Denomination::coin(1),
];

static INR_TABLE: DenominationTable = DenominationTable {
    currency: Currency::Inr,
    denominations: &INR_DENOMINATIONS,
};

static USD_TABLE: DenominationTable = DenominationTable {
    currency: Currency::Usd,
    denominations: &USD_DENOMINATIONS,
};

/// Ordered denomination list of one currency.
///
/// ## Invariant
/// Values within a table are pairwise distinct and strictly descending.
#[derive(Debug)]
pub struct DenominationTable {
    currency: Currency,
    denominations: &'static [Denomination],
}

impl DenominationTable {
    /// Returns the static table for `currency`.
    pub fn for_currency(currency: Currency) -> &'static DenominationTable {
        match currency {
            Currency::Inr => &INR_TABLE,
            Currency::Usd => &USD_TABLE,
        }
    }

    /// Currency this table belongs to.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// All denominations, largest first.
    pub fn denominations(&self) -> &'static [Denomination] {
        self.denominations
    }

    /// Iterates the values, largest first.
    pub fn values(&self) -> impl Iterator<Item = DenominationValue> + '_ {
        self.denominations.iter().map(|d| d.value)
    }

    /// Looks up a denomination by value.
    pub fn get(&self, value: DenominationValue) -> Option<&'static Denomination> {
        self.denominations.iter().find(|d| d.value == value)
    }

    /// True when `value` belongs to this table.
    pub fn contains(&self, value: DenominationValue) -> bool {
        self.get(value).is_some()
    }

    /// Number of denominations.
    pub fn len(&self) -> usize {
        self.denominations.len()
    }

    /// Always false for the built-in tables.
    pub fn is_empty(&self) -> bool {
        self.denominations.is_empty()
    }

    /// Splits the table into two display columns; the first gets the extra
    /// entry when the length is odd.
    pub fn columns(&self) -> (&'static [Denomination], &'static [Denomination]) {
        self.denominations.split_at(self.len().div_ceil(2))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
