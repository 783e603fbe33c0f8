//! # Database Handle
//!
//! Opens the SQLite file that backs the key-value store.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        One Process, One Writer                          │
//! │                                                                         │
//! │  countnote <command>                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← file path, busy timeout, migrate flag           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await                                            │
//! │       │   ├── create file if missing                                    │
//! │       │   ├── single pooled connection (never recycled)                 │
//! │       │   └── embedded migrations                                       │
//! │       ▼                                                                 │
//! │  db.kv() ──► KvRepository ──► kv_entries                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command is one short-lived process doing a handful of small writes,
//! so the pool holds exactly one connection. A second `countnote` started at
//! the same moment waits on the SQLite lock for up to the busy timeout
//! instead of failing straight away. `:memory:` databases live and die with
//! that one connection, which is why it is never closed for idleness.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::kv::KvRepository;

// =============================================================================
// Configuration
// =============================================================================

const IN_MEMORY_PATH: &str = ":memory:";

/// Database configuration.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use countnote_db::DbConfig;
///
/// let config = DbConfig::new("/tmp/countnote.db").busy_timeout(Duration::from_secs(1));
/// assert!(!config.is_in_memory());
/// assert!(DbConfig::in_memory().is_in_memory());
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// How long to wait for another process holding the write lock.
    /// Default: 5 seconds
    pub busy_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Configuration for the file at `path`. The file is created on first
    /// open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// A private database that disappears when the handle is closed.
    pub fn in_memory() -> Self {
        DbConfig::new(IN_MEMORY_PATH)
    }

    /// Sets the lock wait.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// True for [`DbConfig::in_memory`] configurations.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                .create_if_missing(true)
        };

        // FULL: a count that was reported as saved survives a power cut
        Ok(options
            .synchronous(SqliteSynchronous::Full)
            .busy_timeout(self.busy_timeout))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Open database. Clones share the one connection.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database and, unless disabled, brings the schema up to date.
    ///
    /// ## Errors
    /// - `ConnectionFailed` if the file cannot be opened or created
    /// - `MigrationFailed` if the schema cannot be migrated, including a file
    ///   written by a newer build with migrations this one does not know
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening database"
        );

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
        debug!(busy_timeout_ms = config.busy_timeout.as_millis() as u64, "Connection established");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// The key-value repository.
    pub fn kv(&self) -> KvRepository {
        KvRepository::new(self.pool.clone())
    }

    /// Closes the connection. Later repository calls fail.
    pub async fn close(&self) {
        info!("Closing database");
        self.pool.close().await;
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
