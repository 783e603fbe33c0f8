//! # countnote-core: Counting Logic for Count Note
//!
//! This crate holds everything that decides what a count is: denomination
//! tables, the count-input evaluator, the live counts, sessions and history.
//! It never touches a database or the network directly; durable storage
//! comes in through the [`storage::KeyValueStore`] port.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Count Note Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    countnote-cli (front end)                    │   │
//! │  │    show ──► count / inc / dec ──► save ──► history ──► calc     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ countnote-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────┐  ┌────────────┐  ┌────────────┐  ┌──────────┐ │   │
//! │  │   │ expression │  │   store    │  │  session   │  │ history  │ │   │
//! │  │   │ Evaluator  │─►│ CountStore │◄─│  Counter   │─►│ Archive  │ │   │
//! │  │   └────────────┘  └─────┬──────┘  └────────────┘  └────┬─────┘ │   │
//! │  │                         │   KeyValueStore port          │       │   │
//! │  └─────────────────────────┼───────────────────────────────┼───────┘   │
//! │                            │                               │            │
//! │  ┌─────────────────────────▼───────────────────────────────▼───────┐   │
//! │  │                 countnote-db (SQLite key-value table)           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Currency, DenominationValue, CountState, ...)
//! - [`denomination`] - Fixed INR and USD denomination tables
//! - [`money`] - Amount in minor units and display formatting
//! - [`expression`] - Count-input evaluator and restricted arithmetic parser
//! - [`storage`] - KeyValueStore port and key layout
//! - [`store`] - CountStore, the live counts of one currency
//! - [`session`] - CounterSession, the entry point for front ends
//! - [`history`] - Saved snapshots
//! - [`input`] - Text field focus/change/enter/blur behaviour
//! - [`calculator`] - Embedded calculator with bounded history
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Counts are never negative or fractional**: they are `u64` end to end
//! 2. **Bad input fails closed**: a malformed expression keeps the old count
//! 3. **Integer money**: denomination values and totals are minor units
//! 4. **Totals are derived**: folded from the counts on every read
//!
//! ## Example Usage
//!
//! ```rust
//! use countnote_core::history::StoredHistoryArchive;
//! use countnote_core::money::format_amount;
//! use countnote_core::session::CounterSession;
//! use countnote_core::storage::MemoryStore;
//! use countnote_core::{Currency, DenominationValue};
//!
//! let storage = MemoryStore::new();
//! let archive = StoredHistoryArchive::new(&storage);
//! let mut session = CounterSession::open(&storage, archive, Currency::Usd);
//!
//! let quarter: DenominationValue = "0.25".parse().unwrap();
//! session.record_count(quarter, "8").unwrap();
//! session.record_count(quarter, "+ 2 * 2").unwrap();
//!
//! assert_eq!(session.get(quarter), 12);
//! assert_eq!(format_amount(Currency::Usd, session.total_amount(), false), "$3.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod denomination;
pub mod error;
pub mod expression;
pub mod history;
pub mod input;
pub mod money;
pub mod session;
pub mod storage;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use denomination::DenominationTable;
pub use error::{CoreError, CoreResult, ExpressionError, StorageError, ValidationError};
pub use expression::{ExpressionEvaluator, NegativePolicy};
pub use money::Amount;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest count a single denomination may hold.
///
/// ## Business Reason
/// Catches runaway expressions such as `9999999999*9` and keeps
/// `value × count` comfortably inside `i64` minor units.
pub const MAX_COUNT: u64 = 999_999_999;

/// Maximum length of a snapshot note, in characters.
pub const MAX_NOTE_LENGTH: usize = 200;
