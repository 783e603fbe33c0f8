//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StorageError::Backend (countnote-core) ← What the port reports        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CountStore logs and keeps going / CLI prints the message              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use countnote_core::StorageError;
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    ///
    /// ## When This Occurs
    /// - Invalid SQL in migration
    /// - Migration version conflict
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Timed out waiting for the single connection.
    #[error("Database is busy")]
    Busy,

    /// The blocking adapter could not start its runtime.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → DbError::QueryFailed
/// sqlx::Error::PoolTimedOut   → DbError::Busy
/// sqlx::Error::PoolClosed     → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),

            sqlx::Error::PoolTimedOut => DbError::Busy,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<DbError> for StorageError {
    fn from(err: DbError) -> Self {
        StorageError::Backend(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================
