//! # History Archive
//!
//! Saved counting sessions, one list per currency, newest first.
//!
//! ```text
//! CounterSession::save_snapshot()
//!         │
//!         ▼  HistorySnapshot
//! ┌──────────────────────┐     countNoteHistory_INR  [newest, ..., oldest]
//! │    HistoryArchive    │ ──► countNoteHistory_USD  [newest, ..., oldest]
//! └──────────────────────┘
//! ```
//!
//! Without a limit the lists grow without bound. With a limit, appending
//! drops the oldest entries beyond it.

use std::num::NonZeroUsize;

use tracing::{debug, info, warn};

use crate::error::CoreResult;
use crate::storage::{history_key, read_json, write_json, KeyValueStore};
use crate::types::{Currency, HistorySnapshot};
use crate::validation::validate_snapshot;

/// Storage for saved snapshots.
pub trait HistoryArchive {
    /// Stores a snapshot at the front of its currency's list.
    fn append(&self, snapshot: HistorySnapshot) -> CoreResult<()>;

    /// All snapshots of `currency`, newest first.
    fn list(&self, currency: Currency) -> CoreResult<Vec<HistorySnapshot>>;

    /// Looks up one snapshot.
    fn get(&self, currency: Currency, id: &str) -> CoreResult<Option<HistorySnapshot>> {
        Ok(self.list(currency)?.into_iter().find(|s| s.id == id))
    }

    /// Deletes one snapshot. Returns false if the id was not present.
    fn remove(&self, currency: Currency, id: &str) -> CoreResult<bool>;

    /// Deletes every snapshot of `currency`.
    fn clear(&self, currency: Currency) -> CoreResult<()>;
}

// =============================================================================
// Key-Value Backed Archive
// =============================================================================

/// [`HistoryArchive`] that keeps each currency's list as one JSON array.
#[derive(Debug, Clone)]
pub struct StoredHistoryArchive<S: KeyValueStore> {
    storage: S,
    limit: Option<NonZeroUsize>,
}

impl<S: KeyValueStore> StoredHistoryArchive<S> {
    /// Creates an unbounded archive.
    pub fn new(storage: S) -> Self {
        StoredHistoryArchive {
            storage,
            limit: None,
        }
    }

    /// Keeps at most `limit` snapshots per currency.
    pub fn with_limit(mut self, limit: Option<NonZeroUsize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn limit(&self) -> Option<NonZeroUsize> {
        self.limit
    }

    /// Reads the stored list, skipping entries that fail
    /// [`validate_snapshot`] so nothing downstream folds a bad count.
    fn load(&self, currency: Currency) -> CoreResult<Vec<HistorySnapshot>> {
        let entries: Vec<HistorySnapshot> =
            read_json(&self.storage, &history_key(currency))?.unwrap_or_default();

        Ok(entries
            .into_iter()
            .filter(|snapshot| match validate_snapshot(snapshot) {
                Ok(()) if snapshot.currency == currency => true,
                Ok(()) => {
                    warn!(
                        currency = %currency,
                        id = %snapshot.id,
                        "Skipping snapshot filed under the wrong currency"
                    );
                    false
                }
                Err(err) => {
                    warn!(
                        currency = %currency,
                        id = %snapshot.id,
                        error = %err,
                        "Skipping invalid stored snapshot"
                    );
                    false
                }
            })
            .collect())
    }

    fn store(&self, currency: Currency, entries: &[HistorySnapshot]) -> CoreResult<()> {
        write_json(&self.storage, &history_key(currency), entries)?;
        Ok(())
    }
}

impl<S: KeyValueStore> HistoryArchive for StoredHistoryArchive<S> {
    fn append(&self, snapshot: HistorySnapshot) -> CoreResult<()> {
        let currency = snapshot.currency;
        let mut entries = self.load(currency)?;

        debug!(currency = %currency, id = %snapshot.id, "Archiving snapshot");
        entries.insert(0, snapshot);

        if let Some(limit) = self.limit {
            if entries.len() > limit.get() {
                let dropped = entries.len() - limit.get();
                entries.truncate(limit.get());
                info!(currency = %currency, dropped, "Trimmed history to retention limit");
            }
        }

        self.store(currency, &entries)
    }

    fn list(&self, currency: Currency) -> CoreResult<Vec<HistorySnapshot>> {
        self.load(currency)
    }

    fn remove(&self, currency: Currency, id: &str) -> CoreResult<bool> {
        let mut entries = self.load(currency)?;
        let before = entries.len();
        entries.retain(|s| s.id != id);

        if entries.len() == before {
            return Ok(false);
        }

        self.store(currency, &entries)?;
        Ok(true)
    }

    fn clear(&self, currency: Currency) -> CoreResult<()> {
        self.storage.remove_item(&history_key(currency))?;
        info!(currency = %currency, "History cleared");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
