//! # Document Store
//!
//! JSON documents kept in SQLite, one table per document type:
//! - `DocumentStore` owns the pool and the schema
//! - `DocumentSession` is a unit of work: loads, staged writes, one commit
//! - every save checks document versions (optimistic concurrency)

pub mod document;
pub mod error;
pub mod session;

pub use document::Document;
pub use error::StoreError;
pub use session::DocumentSession;

use sqlx::SqlitePool;
use std::time::Duration;
use tracing::info;

/// Store-wide options
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Saves slower than this are logged as warnings
    pub slow_save_threshold: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            slow_save_threshold: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DocumentStore {
    pool: SqlitePool,
    options: StoreOptions,
}

impl DocumentStore {
    pub fn new(pool: SqlitePool, options: StoreOptions) -> Self {
        Self { pool, options }
    }

    /// Opens a lightweight session (no identity map beyond version tracking)
    pub fn lightweight_session(&self) -> DocumentSession {
        DocumentSession::new(self.pool.clone(), self.options.slow_save_threshold)
    }

    /// Creates the table and indexes for `T` if they are missing
    pub async fn ensure_schema<T: Document>(&self) -> Result<(), StoreError> {
        let table = T::TABLE;

        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id TEXT PRIMARY KEY,
                data TEXT NOT NULL,
                version INTEGER NOT NULL DEFAULT 1,
                last_modified TEXT NOT NULL
            )
            "#
        ))
        .execute(&self.pool)
        .await?;

        for field in T::INDEXED_FIELDS {
            sqlx::query(&format!(
                "CREATE INDEX IF NOT EXISTS idx_{table}_{field} ON {table} (json_extract(data, '$.{field}'))"
            ))
            .execute(&self.pool)
            .await?;
        }

        info!(table = table, "Document table ready");
        Ok(())
    }

    /// Fails when the table for `T` has not been created
    pub async fn verify_schema<T: Document>(&self) -> Result<(), StoreError> {
        let exists: Option<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(T::TABLE)
                .fetch_optional(&self.pool)
                .await?;

        match exists {
            Some(_) => Ok(()),
            None => Err(StoreError::SchemaMissing(T::TABLE.to_string())),
        }
    }
}
