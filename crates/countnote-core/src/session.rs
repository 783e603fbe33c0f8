//! # Counter Session
//!
//! The single entry point a front end drives. Every text field, button and
//! key press ends up in one of the methods here.
//!
//! ## State Machine (per currency)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Uninitialized ──open/switch──► Loaded ◄──────────────┐                 │
//! │                                   │                   │ persisted       │
//! │                                   │ record_count      │                 │
//! │                                   │ increment         │                 │
//! │                                   │ decrement         │                 │
//! │                                   ▼                   │                 │
//! │                                Mutating ──────────────┘                 │
//! │                                                                         │
//! │  reset():           Loaded ──► Loaded (all zero)                        │
//! │  switch_currency(): Loaded(A) ──► Uninitialized(B) ──► Loaded(B)        │
//! │                     A stays durably stored, untouched                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Policy
//! - Bad count text never errors: the evaluator keeps the previous count.
//! - Write-through persistence failures are logged by [`CountStore`].
//! - `save_snapshot` is an explicit user action, so archive failures are
//!   returned to the caller.

use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};
use crate::expression::ExpressionEvaluator;
use crate::history::HistoryArchive;
use crate::money::Amount;
use crate::storage::KeyValueStore;
use crate::store::CountStore;
use crate::types::{Currency, DenominationValue, HistorySnapshot, Totals};
use crate::validation::{validate_note, validate_snapshot_id};

/// Orchestrates one active [`CountStore`] plus the history archive.
///
/// ## Example
/// ```rust
/// use countnote_core::history::StoredHistoryArchive;
/// use countnote_core::session::CounterSession;
/// use countnote_core::storage::MemoryStore;
/// use countnote_core::{Currency, DenominationValue};
///
/// let storage = MemoryStore::new();
/// let archive = StoredHistoryArchive::new(&storage);
/// let mut session = CounterSession::open(&storage, archive, Currency::Inr);
/// let note = DenominationValue::from_major(500);
///
/// session.record_count(note, "5").unwrap();
/// session.record_count(note, "+2").unwrap();
/// assert_eq!(session.totals().total_count, 7);
///
/// let snapshot = session.save_snapshot(Some("morning")).unwrap();
/// assert_eq!(snapshot.total_amount.major(), 3500);
/// ```
#[derive(Debug)]
pub struct CounterSession<S, A>
where
    S: KeyValueStore + Clone,
    A: HistoryArchive,
{
    storage: S,
    store: CountStore<S>,
    archive: A,
    evaluator: ExpressionEvaluator,
}

impl<S, A> CounterSession<S, A>
where
    S: KeyValueStore + Clone,
    A: HistoryArchive,
{
    /// Opens a session on `currency`, loading its persisted counts.
    pub fn open(storage: S, archive: A, currency: Currency) -> Self {
        let store = CountStore::open(storage.clone(), currency);
        info!(currency = %currency, "Counter session opened");

        CounterSession {
            storage,
            store,
            archive,
            evaluator: ExpressionEvaluator::default(),
        }
    }

    /// Replaces the count-input evaluator.
    pub fn with_evaluator(mut self, evaluator: ExpressionEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn currency(&self) -> Currency {
        self.store.currency()
    }

    pub fn store(&self) -> &CountStore<S> {
        &self.store
    }

    pub fn archive(&self) -> &A {
        &self.archive
    }

    pub fn evaluator(&self) -> ExpressionEvaluator {
        self.evaluator
    }

    pub fn get(&self, value: DenominationValue) -> u64 {
        self.store.get(value)
    }

    pub fn total_amount(&self) -> Amount {
        self.store.total_amount()
    }

    pub fn total_count(&self) -> u64 {
        self.store.total_count()
    }

    pub fn totals(&self) -> Totals {
        self.store.totals()
    }

    // =========================================================================
    // Currency
    // =========================================================================

    /// Makes `currency` active.
    ///
    /// The outgoing currency's counts were already written through on every
    /// mutation; nothing is carried over to the new one.
    pub fn switch_currency(&mut self, currency: Currency) {
        if currency == self.store.currency() {
            return;
        }

        let previous = self.store.currency();
        self.store = CountStore::open(self.storage.clone(), currency);
        info!(from = %previous, to = %currency, "Switched currency");
    }

    // =========================================================================
    // Counting
    // =========================================================================

    /// Feeds raw text through the evaluator and stores the result.
    ///
    /// Returns the resulting count. Unparseable or empty text leaves the
    /// count untouched and is not an error.
    ///
    /// ## Errors
    /// - `UnknownDenomination` if `value` is not in the active table
    pub fn record_count(&mut self, value: DenominationValue, raw: &str) -> CoreResult<u64> {
        self.ensure_known(value)?;
        let current = self.store.get(value);

        match self.evaluator.resolve(raw, current) {
            Some(count) => {
                self.store.set(value, count)?;
                debug!(
                    currency = %self.currency(),
                    denomination = %value,
                    count,
                    "Recorded count"
                );
                Ok(count)
            }
            None => Ok(current),
        }
    }

    /// The `+` button.
    pub fn increment(&mut self, value: DenominationValue) -> CoreResult<u64> {
        self.store.increment(value)
    }

    /// The `-` button. A no-op at zero.
    pub fn decrement(&mut self, value: DenominationValue) -> CoreResult<u64> {
        self.store.decrement(value)
    }

    /// Zeroes the active currency. The caller has already confirmed.
    pub fn reset(&mut self) {
        self.store.reset();
        info!(currency = %self.currency(), "Counts reset");
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Captures the live counts and hands them to the archive.
    ///
    /// The live counts are not modified.
    pub fn save_snapshot(&self, note: Option<&str>) -> CoreResult<HistorySnapshot> {
        let note = validate_note(note)?;
        let snapshot = HistorySnapshot::capture(self.currency(), self.store.serialize(), note);

        self.archive.append(snapshot.clone())?;
        info!(
            currency = %snapshot.currency,
            id = %snapshot.id,
            total_count = snapshot.total_count,
            "Snapshot saved"
        );

        Ok(snapshot)
    }

    /// Saved snapshots of the active currency, newest first.
    pub fn history(&self) -> CoreResult<Vec<HistorySnapshot>> {
        self.archive.list(self.currency())
    }

    /// Replaces the live counts with a saved snapshot's counts.
    ///
    /// ## Errors
    /// - `SnapshotNotFound` if no snapshot has this id
    /// - `CurrencyMismatch` if it was saved under another currency
    pub fn load_snapshot(&mut self, id: &str) -> CoreResult<HistorySnapshot> {
        let id = validate_snapshot_id(id)?;
        let active = self.currency();

        let Some(snapshot) = self.archive.get(active, id)? else {
            for other in Currency::ALL.into_iter().filter(|c| *c != active) {
                if self.archive.get(other, id)?.is_some() {
                    return Err(CoreError::CurrencyMismatch {
                        id: id.to_string(),
                        snapshot: other,
                        active,
                    });
                }
            }
            return Err(CoreError::SnapshotNotFound(id.to_string()));
        };

        self.store.restore(snapshot.denomination_counts.clone())?;
        info!(currency = %active, id = %id, "Snapshot loaded into counter");
        Ok(snapshot)
    }

    fn ensure_known(&self, value: DenominationValue) -> CoreResult<()> {
        if self.store.table().contains(value) {
            Ok(())
        } else {
            Err(CoreError::UnknownDenomination {
                currency: self.currency(),
                value: value.to_string(),
            })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
