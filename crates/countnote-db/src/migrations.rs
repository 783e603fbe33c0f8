//! # Schema Migrations
//!
//! The schema is one table, `kv_entries`, created by the SQL files under
//! `migrations/sqlite/`. They are embedded at compile time and applied on
//! every open.
//!
//! ```text
//! open ──► _sqlx_migrations ──► 001_kv_store.sql   applied, skipped
//!                          └──► NNN_*.sql          pending, run in order
//! ```
//!
//! A database last opened by a newer build carries migrations this build
//! does not embed. Opening it fails rather than writing counts into a schema
//! the binary does not understand.
//!
//! ## Adding New Migrations
//!
//! 1. Add `migrations/sqlite/NNN_description.sql` with the next number
//! 2. Never edit a file that has shipped; the checksum is recorded

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every pending migration in filename order. Each one runs in its
/// own transaction, so a failure leaves the earlier ones in place.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!(embedded = MIGRATOR.migrations.len(), "Checking schema");
    MIGRATOR.run(pool).await?;
    info!("Schema up to date");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
