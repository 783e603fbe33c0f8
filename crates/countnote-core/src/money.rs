//! # Money Module
//!
//! Provides the `Amount` type for counted cash totals.
//!
//! ## Why Integer Minor Units?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Counting a USD till with floats:                                       │
//! │    3 × 0.10 + 0.05 = 0.35000000000000003  ❌ WRONG!                     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (cents / paise)                      │
//! │    3 × 10 + 5 = 35 minor units → "$0.35"                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use countnote_core::money::{format_amount, Amount};
//! use countnote_core::Currency;
//!
//! let total = Amount::from_major(3500);
//! assert_eq!(format_amount(Currency::Usd, total, false), "$3,500.00");
//! assert_eq!(format_amount(Currency::Inr, total, false), "₹3,500");
//! assert_eq!(format_amount(Currency::Inr, total, true), "••••••");
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

use crate::types::Currency;

/// Minor units in one major unit (cents per dollar, paise per rupee).
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Shown in place of any amount while amounts are hidden.
pub const HIDDEN_AMOUNT_MASK: &str = "••••••";

// =============================================================================
// Amount Type
// =============================================================================

/// A monetary value in minor units (1/100 of the currency's major unit).
///
/// ## Where Amount is Used
/// ```text
/// Denomination.value ──► value × count ──► CountState.total_amount
///                                                 │
///                                                 ├──► HistorySnapshot
///                                                 └──► format_amount()
/// ```
///
/// ## Wire Format
/// Serialized as a JSON number in major units (`3500`, `12.5`) so persisted
/// history stays readable by other front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// Creates an amount from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use countnote_core::money::Amount;
    ///
    /// let quarter = Amount::from_minor(25);
    /// assert_eq!(quarter.minor_units(), 25);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Amount(minor)
    }

    /// Creates an amount from whole major units.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Amount(major * MINOR_UNITS_PER_MAJOR)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// Returns the whole major-unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_UNITS_PER_MAJOR
    }

    /// Returns the minor-unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_UNITS_PER_MAJOR).abs()
    }

    /// Returns zero.
    #[inline]
    pub const fn zero() -> Self {
        Amount(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Value as a float in major units, for display layers that need one.
    pub fn as_major_f64(&self) -> f64 {
        self.0 as f64 / MINOR_UNITS_PER_MAJOR as f64
    }
}

// =============================================================================
// Formatting
// =============================================================================

/// Formats an amount the way the counter displays it.
///
/// ## Rules
/// - Thousands are grouped with commas (`1,234`)
/// - USD always shows two fraction digits: `$12.00`
/// - INR drops the fraction when it is zero: `₹2,500`, but `₹12.5`
/// - `hidden` replaces everything with [`HIDDEN_AMOUNT_MASK`]
pub fn format_amount(currency: Currency, amount: Amount, hidden: bool) -> String {
    if hidden {
        return HIDDEN_AMOUNT_MASK.to_string();
    }

    let sign = if amount.0 < 0 { "-" } else { "" };
    let whole = group_thousands(amount.major().unsigned_abs());
    let minor = amount.minor_part();

    let fraction = match currency.min_fraction_digits() {
        2 => format!(".{:02}", minor),
        _ if minor == 0 => String::new(),
        _ if minor % 10 == 0 => format!(".{}", minor / 10),
        _ => format!(".{:02}", minor),
    };

    format!("{}{}{}{}", sign, currency.symbol(), whole, fraction)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering without a symbol: `3500.00`.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.minor_part() == 0 {
            serializer.serialize_i64(self.major())
        } else {
            serializer.serialize_f64(self.as_major_f64())
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let major = f64::deserialize(deserializer)?;
        if !major.is_finite() {
            return Err(D::Error::custom("amount must be a finite number"));
        }
        Ok(Amount((major * MINOR_UNITS_PER_MAJOR as f64).round() as i64))
    }
}

impl Default for Amount {
    fn default() -> Self {
        Amount::zero()
    }
}

impl Add for Amount {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Amount(self.0 + other.0)
    }
}

impl AddAssign for Amount {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Amount {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Amount(self.0 - other.0)
    }
}

/// Multiplication by a count.
impl Mul<u64> for Amount {
    type Output = Self;

    #[inline]
    fn mul(self, count: u64) -> Self {
        Amount(self.0 * count as i64)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
