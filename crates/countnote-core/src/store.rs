//! # Count Store
//!
//! Live denomination counts of one currency, written through to storage on
//! every mutation.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   open(storage, INR)                                                    │
//! │     │                                                                   │
//! │     ├── key "denominationCounts_INR" present ──► restore counts         │
//! │     └── absent / unreadable ───────────────────► every count at 0       │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │   ┌──────────┐  set / increment / decrement / reset / restore           │
//! │   │  Loaded  │ ─────────────────────────────────────────┐               │
//! │   └──────────┘ ◄──────────── persist full state ────────┘               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persistence Failures
//! A failed write is logged and swallowed. The in-memory counts stay
//! authoritative for the rest of the session.

use tracing::{debug, warn};

use crate::denomination::DenominationTable;
use crate::error::{CoreError, CoreResult};
use crate::money::Amount;
use crate::storage::{counts_key, read_json, write_json, KeyValueStore};
use crate::types::{CountState, Currency, DenominationValue, Totals};
use crate::validation::validate_count;
use crate::MAX_COUNT;

/// Counts for the denominations of a single currency.
///
/// ## Example
/// ```rust
/// use countnote_core::storage::MemoryStore;
/// use countnote_core::store::CountStore;
/// use countnote_core::{Currency, DenominationValue};
///
/// let mut store = CountStore::open(MemoryStore::new(), Currency::Inr);
/// let five_hundred = DenominationValue::from_major(500);
///
/// store.set(five_hundred, 5).unwrap();
/// store.increment(five_hundred).unwrap();
/// assert_eq!(store.get(five_hundred), 6);
/// assert_eq!(store.total_amount().major(), 3000);
/// ```
#[derive(Debug)]
pub struct CountStore<S: KeyValueStore> {
    currency: Currency,
    table: &'static DenominationTable,
    counts: CountState,
    storage: S,
}

impl<S: KeyValueStore> CountStore<S> {
    /// Loads the persisted counts of `currency`, or starts from zero.
    ///
    /// Persisted entries for denominations outside the currency's table are
    /// dropped; missing entries read as zero.
    pub fn open(storage: S, currency: Currency) -> Self {
        let table = currency.table();
        let mut counts = CountState::zeroed(table);

        match read_json::<CountState, _>(&storage, &counts_key(currency)) {
            Ok(Some(persisted)) => {
                for (value, count) in persisted.iter() {
                    if table.contains(value) && count <= MAX_COUNT {
                        counts.insert(value, count);
                    } else {
                        warn!(
                            currency = %currency,
                            denomination = %value,
                            count,
                            "Dropping invalid persisted count"
                        );
                    }
                }
                debug!(currency = %currency, "Restored persisted counts");
            }
            Ok(None) => {
                debug!(currency = %currency, "No persisted counts, starting from zero");
            }
            Err(err) => {
                warn!(currency = %currency, error = %err, "Could not load persisted counts");
            }
        }

        CountStore {
            currency,
            table,
            counts,
            storage,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn table(&self) -> &'static DenominationTable {
        self.table
    }

    /// Live counts.
    pub fn counts(&self) -> &CountState {
        &self.counts
    }

    /// Count of `value`; zero for anything not in the table.
    pub fn get(&self, value: DenominationValue) -> u64 {
        self.counts.get(value)
    }

    /// Σ value × count, folded on every call.
    pub fn total_amount(&self) -> Amount {
        self.counts.total_amount()
    }

    /// Σ count, folded on every call.
    pub fn total_count(&self) -> u64 {
        self.counts.total_count()
    }

    pub fn totals(&self) -> Totals {
        self.counts.totals()
    }

    /// Gives back the storage handle.
    pub fn into_storage(self) -> S {
        self.storage
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Sets the count of one denomination.
    ///
    /// ## Errors
    /// - `UnknownDenomination` if `value` is not in the active table
    /// - `CountTooLarge` if `count` exceeds [`MAX_COUNT`]
    pub fn set(&mut self, value: DenominationValue, count: u64) -> CoreResult<()> {
        self.ensure_known(value)?;
        if validate_count(count).is_err() {
            return Err(CoreError::CountTooLarge {
                requested: count,
                max: MAX_COUNT,
            });
        }

        self.counts.insert(value, count);
        self.persist();
        Ok(())
    }

    /// Adds one. A no-op at [`MAX_COUNT`]. Returns the new count.
    pub fn increment(&mut self, value: DenominationValue) -> CoreResult<u64> {
        self.ensure_known(value)?;
        let current = self.counts.get(value);
        if current >= MAX_COUNT {
            return Ok(current);
        }

        self.counts.insert(value, current + 1);
        self.persist();
        Ok(current + 1)
    }

    /// Subtracts one. A no-op at zero. Returns the new count.
    pub fn decrement(&mut self, value: DenominationValue) -> CoreResult<u64> {
        self.ensure_known(value)?;
        let current = self.counts.get(value);
        if current == 0 {
            return Ok(0);
        }

        self.counts.insert(value, current - 1);
        self.persist();
        Ok(current - 1)
    }

    /// Sets every denomination of this currency back to zero.
    pub fn reset(&mut self) {
        self.counts = CountState::zeroed(self.table);
        self.persist();
    }

    /// Full copy of the live counts.
    ///
    /// Always holds every denomination of the table, zeros included, so
    /// `restore(serialize())` reproduces it exactly.
    pub fn serialize(&self) -> CountState {
        self.counts.clone()
    }

    /// Replaces the live counts with `snapshot`.
    ///
    /// Denominations missing from `snapshot` become zero, so a sparse
    /// snapshot comes back from [`serialize`](Self::serialize) zero-filled to
    /// the full table: every count reads the same, but the map is not
    /// identical. The snapshot is validated as a whole before anything
    /// changes.
    pub fn restore(&mut self, snapshot: CountState) -> CoreResult<()> {
        let mut restored = CountState::zeroed(self.table);
        for (value, count) in snapshot.iter() {
            self.ensure_known(value)?;
            if count > MAX_COUNT {
                return Err(CoreError::CountTooLarge {
                    requested: count,
                    max: MAX_COUNT,
                });
            }
            restored.insert(value, count);
        }

        self.counts = restored;
        self.persist();
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn ensure_known(&self, value: DenominationValue) -> CoreResult<()> {
        if self.table.contains(value) {
            Ok(())
        } else {
            Err(CoreError::UnknownDenomination {
                currency: self.currency,
                value: value.to_string(),
            })
        }
    }

    fn persist(&self) {
        if let Err(err) = write_json(&self.storage, &counts_key(self.currency), &self.counts) {
            warn!(
                currency = %self.currency,
                error = %err,
                "Failed to persist counts, keeping in-memory state"
            );
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::tests::FlakyStore;
    use crate::storage::MemoryStore;

    fn note(major: i64) -> DenominationValue {
        DenominationValue::from_major(major)
    }

    fn coin(minor: i64) -> DenominationValue {
        DenominationValue::from_minor(minor)
    }

    #[test]
    fn test_open_starts_zeroed() {
        let store = CountStore::open(MemoryStore::new(), Currency::Usd);
        assert_eq!(store.counts().len(), 10);
        assert_eq!(store.total_count(), 0);
        assert!(store.total_amount().is_zero());
        assert_eq!(store.get(coin(25)), 0);
    }

    #[test]
    fn test_get_unknown_denomination_is_zero() {
        let store = CountStore::open(MemoryStore::new(), Currency::Inr);
        assert_eq!(store.get(coin(25)), 0);
    }

    #[test]
    fn test_set_unknown_denomination_is_rejected() {
        let mut store = CountStore::open(MemoryStore::new(), Currency::Inr);
        let err = store.set(coin(25), 4).unwrap_err();
        assert!(matches!(err, CoreError::UnknownDenomination { .. }));
        assert_eq!(store.total_count(), 0);
    }

    #[test]
    fn test_set_above_maximum_is_rejected() {
        let mut store = CountStore::open(MemoryStore::new(), Currency::Inr);
        store.set(note(10), 3).unwrap();
        assert!(store.set(note(10), MAX_COUNT + 1).is_err());
        assert_eq!(store.get(note(10)), 3);
    }

    #[test]
    fn test_totals_match_independent_fold() {
        let mut store = CountStore::open(MemoryStore::new(), Currency::Usd);
        store.set(note(100), 2).unwrap();
        store.set(note(5), 3).unwrap();
        store.set(coin(25), 7).unwrap();
        store.set(coin(10), 3).unwrap();
        store.set(coin(5), 1).unwrap();

        let expected_amount: i64 = store
            .table()
            .values()
            .map(|v| v.minor_units() * store.get(v) as i64)
            .sum();
        let expected_count: u64 = store.table().values().map(|v| store.get(v)).sum();

        assert_eq!(store.total_amount().minor_units(), expected_amount);
        assert_eq!(store.total_amount().minor_units(), 21_710);
        assert_eq!(store.total_count(), expected_count);
        assert_eq!(store.total_count(), 16);
    }

    #[test]
    fn test_decrement_at_zero_stays_zero() {
        for currency in Currency::ALL {
            let mut store = CountStore::open(MemoryStore::new(), currency);
            for value in currency.table().values() {
                assert_eq!(store.decrement(value).unwrap(), 0);
                assert_eq!(store.get(value), 0);
            }
        }
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut store = CountStore::open(MemoryStore::new(), Currency::Inr);
        assert_eq!(store.increment(note(2)).unwrap(), 1);
        assert_eq!(store.increment(note(2)).unwrap(), 2);
        assert_eq!(store.decrement(note(2)).unwrap(), 1);

        store.set(note(1), MAX_COUNT).unwrap();
        assert_eq!(store.increment(note(1)).unwrap(), MAX_COUNT);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut store = CountStore::open(MemoryStore::new(), Currency::Inr);
        store.set(note(500), 9).unwrap();
        store.set(note(1), 4).unwrap();

        store.reset();
        let once = store.serialize();
        store.reset();
        assert_eq!(store.serialize(), once);
        assert_eq!(store.total_count(), 0);
        assert_eq!(once.len(), 9);
    }

    #[test]
    fn test_serialize_restore_roundtrip() {
        let mut store = CountStore::open(MemoryStore::new(), Currency::Usd);
        store.set(note(20), 11).unwrap();
        store.set(coin(1), 99).unwrap();
        let saved = store.serialize();

        store.reset();
        store.restore(saved.clone()).unwrap();
        assert_eq!(store.serialize(), saved);

        let empty = CountState::new();
        store.restore(empty).unwrap();
        assert_eq!(store.serialize(), CountState::zeroed(store.table()));
    }

    #[test]
    fn test_restore_sparse_state_is_zero_filled() {
        let mut store = CountStore::open(MemoryStore::new(), Currency::Inr);
        let sparse: CountState = [(note(200), 4)].into_iter().collect();
        store.restore(sparse.clone()).unwrap();

        let full = store.serialize();
        assert_ne!(full, sparse);
        assert_eq!(full.len(), store.table().len());
        for value in store.table().values() {
            assert_eq!(full.get(value), sparse.get(value));
        }
    }

    #[test]
    fn test_restore_rejects_foreign_denomination() {
        let mut store = CountStore::open(MemoryStore::new(), Currency::Inr);
        store.set(note(50), 2).unwrap();

        let foreign: CountState = [(note(50), 1), (coin(25), 3)].into_iter().collect();
        assert!(store.restore(foreign).is_err());
        assert_eq!(store.get(note(50)), 2);
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let backing = MemoryStore::new();
        {
            let mut store = CountStore::open(&backing, Currency::Inr);
            store.set(note(500), 5).unwrap();
            store.increment(note(500)).unwrap();
            store.decrement(note(2)).unwrap();
        }

        let reopened = CountStore::open(&backing, Currency::Inr);
        assert_eq!(reopened.get(note(500)), 6);
        assert_eq!(reopened.total_amount().major(), 3000);

        let raw = backing.get_item("denominationCounts_INR").unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["500"], 6);
    }

    #[test]
    fn test_open_tolerates_corrupt_and_foreign_entries() {
        let backing = MemoryStore::new();
        backing
            .set_item("denominationCounts_INR", r#"{"500":2,"0.25":9}"#)
            .unwrap();
        backing.set_item("denominationCounts_USD", "garbage").unwrap();

        let inr = CountStore::open(&backing, Currency::Inr);
        assert_eq!(inr.get(note(500)), 2);
        assert_eq!(inr.total_count(), 2);

        let usd = CountStore::open(&backing, Currency::Usd);
        assert_eq!(usd.total_count(), 0);
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let backing = FlakyStore::default();
        let mut store = CountStore::open(&backing, Currency::Inr);
        store.set(note(100), 1).unwrap();

        backing.fail_writes.set(true);
        store.set(note(100), 8).unwrap();
        assert_eq!(store.get(note(100)), 8);

        backing.fail_writes.set(false);
        let reopened = CountStore::open(&backing, Currency::Inr);
        assert_eq!(reopened.get(note(100)), 1);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        /// A currency plus one count per denomination of its table.
        fn counted() -> impl Strategy<Value = (Currency, Vec<u64>)> {
            prop_oneof![Just(Currency::Inr), Just(Currency::Usd)].prop_flat_map(|currency| {
                let len = currency.table().len();
                (Just(currency), prop::collection::vec(0..=MAX_COUNT, len))
            })
        }

        fn filled(currency: Currency, counts: &[u64]) -> CountStore<MemoryStore> {
            let mut store = CountStore::open(MemoryStore::new(), currency);
            for (value, &count) in currency.table().values().zip(counts) {
                store.set(value, count).unwrap();
            }
            store
        }

        proptest! {
            #[test]
            fn test_totals_equal_fold_over_table((currency, counts) in counted()) {
                let store = filled(currency, &counts);
                let amount: i64 = currency
                    .table()
                    .values()
                    .zip(&counts)
                    .map(|(value, &count)| value.minor_units() * count as i64)
                    .sum();

                prop_assert_eq!(store.total_amount().minor_units(), amount);
                prop_assert_eq!(store.total_count(), counts.iter().sum::<u64>());
                prop_assert_eq!(store.totals().total_count, store.total_count());
            }

            #[test]
            fn test_restore_of_serialize_is_identity((currency, counts) in counted()) {
                let mut store = filled(currency, &counts);
                let saved = store.serialize();

                store.reset();
                store.restore(saved.clone()).unwrap();
                prop_assert_eq!(&store.serialize(), &saved);

                let reopened = CountStore::open(store.into_storage(), currency);
                prop_assert_eq!(&reopened.serialize(), &saved);
            }

            #[test]
            fn test_buttons_never_go_below_zero(
                presses in prop::collection::vec((any::<bool>(), any::<prop::sample::Index>()), 0..64)
            ) {
                let mut store = CountStore::open(MemoryStore::new(), Currency::Inr);
                let values: Vec<DenominationValue> = store.table().values().collect();
                let mut expected = vec![0u64; values.len()];

                for (up, index) in presses {
                    let i = index.index(values.len());
                    let count = if up {
                        expected[i] += 1;
                        store.increment(values[i]).unwrap()
                    } else {
                        expected[i] = expected[i].saturating_sub(1);
                        store.decrement(values[i]).unwrap()
                    };
                    prop_assert_eq!(count, expected[i]);
                }
                prop_assert_eq!(store.total_count(), expected.iter().sum::<u64>());
            }
        }
    }
}
