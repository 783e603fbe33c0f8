//! # countnote-db: Database Layer for Count Note
//!
//! This crate provides durable storage for Count Note.
//! It uses SQLite with sqlx and exposes the result through the core's
//! synchronous `KeyValueStore` port.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Count Note Data Flow                             │
//! │                                                                         │
//! │  CounterSession::record_count ──► CountStore ──► KeyValueStore          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   countnote-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ SqliteKey-    │    │   Database    │    │  Migrations  │  │   │
//! │  │   │ ValueStore    │───►│   (pool.rs)   │    │  (embedded)  │  │   │
//! │  │   │ (store.rs)    │    │ KvRepository  │    │ 001_kv_store │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <platform data dir>/countnote.db                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Opening the database file (`DbConfig`, `Database`)
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Key-value repository
//! - [`store`] - Blocking `KeyValueStore` adapter
//!
//! ## Usage
//!
//! ```rust,ignore
//! use countnote_core::storage::KeyValueStore;
//! use countnote_db::{DbConfig, SqliteKeyValueStore};
//!
//! let store = SqliteKeyValueStore::open(DbConfig::new("countnote.db"))?;
//! store.set_item("calculatorHistory", "[]")?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::kv::KvRepository;
pub use store::SqliteKeyValueStore;
