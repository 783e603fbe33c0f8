//! # Repository Module
//!
//! Database repository implementations for Count Note.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  SqliteKeyValueStore (blocking port adapter)                           │
//! │       │                                                                 │
//! │       │  db.kv().set("denominationCounts_INR", "{...}")                │
//! │       ▼                                                                 │
//! │  KvRepository                                                          │
//! │  ├── get(&self, key)                                                   │
//! │  ├── set(&self, key, value)                                            │
//! │  ├── remove(&self, key)                                                │
//! │  └── keys(&self)                                                       │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database (kv_entries)                                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`kv::KvRepository`] - String key-value rows

pub mod kv;
