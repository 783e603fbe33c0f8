//! # Key-Value Repository
//!
//! Rows of the `kv_entries` table. Values are opaque JSON text; the shapes
//! belong to countnote-core.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for key-value rows.
#[derive(Debug, Clone)]
pub struct KvRepository {
    pool: SqlitePool,
}

impl KvRepository {
    /// Creates a new KvRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KvRepository { pool }
    }

    /// Reads the value stored under `key`.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM kv_entries WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    /// Inserts or replaces the value under `key`.
    ///
    /// ## Upsert
    /// ```text
    /// INSERT ... ON CONFLICT(key) DO UPDATE
    ///   └── one statement, so a reader never sees the key missing
    /// ```
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, bytes = value.len(), "Writing key");

        sqlx::query(
            r#"
            INSERT INTO kv_entries (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes `key`. Returns false if it did not exist.
    pub async fn remove(&self, key: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM kv_entries WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All keys, sorted.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM kv_entries ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        Ok(keys)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let db = database().await;
        assert_eq!(db.kv().get("denominationCounts_INR").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_overwrite() {
        let db = database().await;
        let kv = db.kv();

        kv.set("denominationCounts_INR", r#"{"500":5}"#).await.unwrap();
        kv.set("denominationCounts_INR", r#"{"500":7}"#).await.unwrap();

        assert_eq!(
            kv.get("denominationCounts_INR").await.unwrap().as_deref(),
            Some(r#"{"500":7}"#)
        );
        assert_eq!(kv.keys().await.unwrap(), vec!["denominationCounts_INR"]);
    }

    #[tokio::test]
    async fn test_remove() {
        let db = database().await;
        let kv = db.kv();

        kv.set("calculatorHistory", "[]").await.unwrap();
        assert!(kv.remove("calculatorHistory").await.unwrap());
        assert!(!kv.remove("calculatorHistory").await.unwrap());
        assert_eq!(kv.get("calculatorHistory").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_keys_are_sorted() {
        let db = database().await;
        let kv = db.kv();

        kv.set("denominationCounts_USD", "{}").await.unwrap();
        kv.set("calculatorHistory", "[]").await.unwrap();
        kv.set("countNoteHistory_INR", "[]").await.unwrap();

        assert_eq!(
            kv.keys().await.unwrap(),
            vec![
                "calculatorHistory",
                "countNoteHistory_INR",
                "denominationCounts_USD"
            ]
        );
    }
}
