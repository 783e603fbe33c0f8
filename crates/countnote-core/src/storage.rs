//! # Storage Port
//!
//! The durable key-value port that `CountStore`, the history archive and the
//! calculator write through.
//!
//! ## Key Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  denominationCounts_INR   {"500": 7, "2": 3, ...}      CountStore       │
//! │  denominationCounts_USD   {"0.25": 4, ...}             CountStore       │
//! │  countNoteHistory_INR     [snapshot, snapshot, ...]    HistoryArchive   │
//! │  countNoteHistory_USD     [snapshot, ...]              HistoryArchive   │
//! │  calculatorHistory        [record, record, ...]        Calculator       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are JSON text. Implementations only move strings around; encoding
//! and decoding happen in [`read_json`] and [`write_json`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StorageError, StorageResult};
use crate::types::Currency;

/// Key holding the calculator history.
pub const CALCULATOR_HISTORY_KEY: &str = "calculatorHistory";

/// Key holding the live counts of `currency`.
pub fn counts_key(currency: Currency) -> String {
    format!("denominationCounts_{}", currency.code())
}

/// Key holding the saved snapshots of `currency`.
pub fn history_key(currency: Currency) -> String {
    format!("countNoteHistory_{}", currency.code())
}

// =============================================================================
// KeyValueStore Trait
// =============================================================================

/// Synchronous string key-value storage.
///
/// Methods take `&self`: several components share one store, and every
/// implementation manages its own interior mutability.
pub trait KeyValueStore {
    /// Reads a value; `Ok(None)` when the key was never written.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Writes a value, replacing any previous one.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Deletes a key. Deleting a missing key is not an error.
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }
}

// =============================================================================
// JSON Helpers
// =============================================================================

/// Reads and decodes a JSON value.
pub fn read_json<T, S>(store: &S, key: &str) -> StorageResult<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get_item(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Corrupt {
            key: key.to_string(),
            source,
        })
}

/// Encodes and writes a JSON value.
pub fn write_json<T, S>(store: &S, key: &str, value: &T) -> StorageResult<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Corrupt {
        key: key.to_string(),
        source,
    })?;
    store.set_item(key, &raw)
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-process store. Used by tests and as a scratch backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;

    /// A store whose writes can be switched off to simulate a full disk.
    #[derive(Debug, Default)]
    pub(crate) struct FlakyStore {
        pub inner: MemoryStore,
        pub fail_writes: Cell<bool>,
    }

    impl KeyValueStore for FlakyStore {
        fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
            if self.fail_writes.get() {
                return Err(StorageError::Backend("quota exceeded".to_string()));
            }
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> StorageResult<()> {
            if self.fail_writes.get() {
                return Err(StorageError::Backend("quota exceeded".to_string()));
            }
            self.inner.remove_item(key)
        }
    }

    #[test]
    fn test_key_layout() {
        assert_eq!(counts_key(Currency::Inr), "denominationCounts_INR");
        assert_eq!(history_key(Currency::Usd), "countNoteHistory_USD");
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get_item("a").unwrap(), None);

        store.set_item("a", "1").unwrap();
        store.set_item("a", "2").unwrap();
        assert_eq!(store.get_item("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.len(), 1);

        store.remove_item("a").unwrap();
        store.remove_item("a").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_json_helpers() {
        let store = MemoryStore::new();
        write_json(&store, "nums", &vec![1, 2, 3]).unwrap();
        let nums: Option<Vec<u32>> = read_json(&store, "nums").unwrap();
        assert_eq!(nums, Some(vec![1, 2, 3]));

        store.set_item("bad", "{not json").unwrap();
        let err = read_json::<Vec<u32>, _>(&store, "bad").unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { ref key, .. } if key == "bad"));
    }

    #[test]
    fn test_shared_through_rc() {
        let store = Rc::new(MemoryStore::new());
        let handle = Rc::clone(&store);
        handle.set_item("k", "v").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v"));
    }
}
