//! # Blocking Key-Value Adapter
//!
//! Implements the core's synchronous [`KeyValueStore`] port on top of the
//! async [`KvRepository`](crate::repository::kv::KvRepository).
//!
//! ```text
//! CountStore::set ──► KeyValueStore::set_item (sync)
//!                          │
//!                          ▼  runtime.block_on(...)
//!                     db.kv().set(key, value).await
//!                          │
//!                          ▼
//!                     SQLite kv_entries
//! ```
//!
//! The adapter owns a current-thread tokio runtime. It must not be called
//! from inside another async runtime.

use std::sync::Arc;

use countnote_core::error::StorageResult;
use countnote_core::storage::KeyValueStore;
use tokio::runtime::{Builder, Runtime};
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::pool::{Database, DbConfig};

/// SQLite-backed [`KeyValueStore`]. Clones share the connection and the runtime.
#[derive(Debug, Clone)]
pub struct SqliteKeyValueStore {
    runtime: Arc<Runtime>,
    db: Database,
}

impl SqliteKeyValueStore {
    /// Opens (and migrates) the database described by `config`.
    pub fn open(config: DbConfig) -> DbResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DbError::Runtime(e.to_string()))?;

        let db = runtime.block_on(Database::new(config))?;
        info!("Key-value store ready");

        Ok(SqliteKeyValueStore {
            runtime: Arc::new(runtime),
            db,
        })
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> DbResult<Vec<String>> {
        self.runtime.block_on(self.db.kv().keys())
    }

    /// Closes the connection. Later calls fail with a backend error.
    pub fn close(&self) {
        self.runtime.block_on(self.db.close());
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.runtime.block_on(self.db.kv().get(key))?)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        Ok(self.runtime.block_on(self.db.kv().set(key, value))?)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.runtime.block_on(self.db.kv().remove(key))?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
