use sqlx::SqlitePool;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{Document, StoreError};

/// A write staged by the session, applied by `save_changes`
#[derive(Debug)]
enum PendingOperation {
    /// Insert, or overwrite whatever is stored
    Upsert {
        table: &'static str,
        id: Uuid,
        data: String,
    },
    /// Overwrite only if the stored version still equals `expected_version`
    Update {
        table: &'static str,
        id: Uuid,
        data: String,
        expected_version: u32,
    },
    Delete {
        table: &'static str,
        id: Uuid,
        expected_version: Option<u32>,
    },
}

/// Unit of work over the document tables
///
/// Reads go straight to the pool. Writes are staged and applied together,
/// in staging order, inside one transaction by `save_changes`.
#[derive(Debug)]
pub struct DocumentSession {
    pool: SqlitePool,
    slow_save_threshold: Duration,
    pending: Vec<PendingOperation>,
    loaded_versions: HashMap<(&'static str, Uuid), u32>,
}

fn to_version(raw: i64) -> u32 {
    u32::try_from(raw).unwrap_or_default()
}

fn hydrate<T: Document>(data: &str, version: i64) -> Result<T, StoreError> {
    let mut document: T = serde_json::from_str(data)?;
    document.set_version(to_version(version));
    Ok(document)
}

impl DocumentSession {
    pub(crate) fn new(pool: SqlitePool, slow_save_threshold: Duration) -> Self {
        Self {
            pool,
            slow_save_threshold,
            pending: Vec::new(),
            loaded_versions: HashMap::new(),
        }
    }

    // ============================================================================
    // Reads
    // ============================================================================

    /// Load a document by id and remember the version it was read at
    pub async fn load<T: Document>(&mut self, id: Uuid) -> Result<Option<T>, StoreError> {
        let row: Option<(String, i64)> = sqlx::query_as(&format!(
            "SELECT data, version FROM {} WHERE id = ?",
            T::TABLE
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        let Some((data, version)) = row else {
            return Ok(None);
        };

        let document = hydrate::<T>(&data, version)?;
        self.loaded_versions
            .insert((T::TABLE, id), document.version());

        Ok(Some(document))
    }

    /// All documents of a type, in insertion order
    pub async fn query<T: Document>(&self) -> Result<Vec<T>, StoreError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(&format!(
            "SELECT data, version FROM {} ORDER BY rowid",
            T::TABLE
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|(data, version)| hydrate(data, *version))
            .collect()
    }

    /// One page of `query`; `page` starts at 1
    pub async fn query_page<T: Document>(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<T>, StoreError> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(page_size);

        let rows: Vec<(String, i64)> = sqlx::query_as(&format!(
            "SELECT data, version FROM {} ORDER BY rowid LIMIT ? OFFSET ?",
            T::TABLE
        ))
        .bind(i64::from(page_size))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|(data, version)| hydrate(data, *version))
            .collect()
    }

    /// Documents whose top-level JSON array `array_field` contains `value`
    pub async fn query_contains<T: Document>(
        &self,
        array_field: &str,
        value: &str,
    ) -> Result<Vec<T>, StoreError> {
        let table = T::TABLE;
        let rows: Vec<(String, i64)> = sqlx::query_as(&format!(
            r#"
            SELECT data, version FROM {table}
            WHERE EXISTS (
                SELECT 1 FROM json_each({table}.data, ?) WHERE json_each.value = ?
            )
            ORDER BY rowid
            "#
        ))
        .bind(format!("$.{}", array_field))
        .bind(value)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|(data, version)| hydrate(data, *version))
            .collect()
    }

    // ============================================================================
    // Staged writes
    // ============================================================================

    /// Stage an upsert
    ///
    /// Documents loaded through this session are version-checked against the
    /// version they were loaded at; anything else is inserted or overwritten.
    pub fn store<T: Document>(&mut self, document: &T) -> Result<(), StoreError> {
        let id = document.id();
        let data = serde_json::to_string(document)?;

        let operation = match self.loaded_versions.get(&(T::TABLE, id)) {
            Some(&expected_version) => PendingOperation::Update {
                table: T::TABLE,
                id,
                data,
                expected_version,
            },
            None => PendingOperation::Upsert {
                table: T::TABLE,
                id,
                data,
            },
        };

        self.pending.push(operation);
        Ok(())
    }

    /// Stage an update that only applies if the stored version is `expected_version`
    pub fn store_with_version<T: Document>(
        &mut self,
        document: &T,
        expected_version: u32,
    ) -> Result<(), StoreError> {
        let data = serde_json::to_string(document)?;

        self.pending.push(PendingOperation::Update {
            table: T::TABLE,
            id: document.id(),
            data,
            expected_version,
        });
        Ok(())
    }

    pub fn delete<T: Document>(&mut self, document: &T) {
        let id = document.id();

        self.pending.push(PendingOperation::Delete {
            table: T::TABLE,
            id,
            expected_version: self.loaded_versions.get(&(T::TABLE, id)).copied(),
        });
    }

    /// Apply every staged write in one transaction
    ///
    /// A version mismatch rolls the whole transaction back. Staged writes are
    /// consumed either way.
    pub async fn save_changes(&mut self) -> Result<(), StoreError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let started = Instant::now();
        let operations = std::mem::take(&mut self.pending);
        let now = chrono::Utc::now().to_rfc3339();
        let mut saved_versions: Vec<((&'static str, Uuid), Option<u32>)> = Vec::new();

        let mut tx = self.pool.begin().await?;

        for operation in &operations {
            match operation {
                PendingOperation::Upsert { table, id, data } => {
                    let (version,): (i64,) = sqlx::query_as(&format!(
                        r#"
                        INSERT INTO {table} (id, data, version, last_modified)
                        VALUES (?, ?, 1, ?)
                        ON CONFLICT(id) DO UPDATE SET
                            data = excluded.data,
                            version = {table}.version + 1,
                            last_modified = excluded.last_modified
                        RETURNING version
                        "#
                    ))
                    .bind(id.to_string())
                    .bind(data)
                    .bind(&now)
                    .fetch_one(&mut *tx)
                    .await?;

                    saved_versions.push(((*table, *id), Some(to_version(version))));
                }
                PendingOperation::Update {
                    table,
                    id,
                    data,
                    expected_version,
                } => {
                    let result = sqlx::query(&format!(
                        "UPDATE {table} SET data = ?, version = version + 1, last_modified = ? WHERE id = ? AND version = ?"
                    ))
                    .bind(data)
                    .bind(&now)
                    .bind(id.to_string())
                    .bind(i64::from(*expected_version))
                    .execute(&mut *tx)
                    .await?;

                    if result.rows_affected() == 0 {
                        warn!(table = *table, id = %id, expected_version, "Version conflict on update");
                        return Err(StoreError::Concurrency {
                            id: *id,
                            expected: *expected_version,
                        });
                    }

                    saved_versions.push(((*table, *id), Some(expected_version + 1)));
                }
                PendingOperation::Delete {
                    table,
                    id,
                    expected_version,
                } => {
                    let result = match expected_version {
                        Some(expected) => {
                            sqlx::query(&format!(
                                "DELETE FROM {table} WHERE id = ? AND version = ?"
                            ))
                            .bind(id.to_string())
                            .bind(i64::from(*expected))
                            .execute(&mut *tx)
                            .await?
                        }
                        None => {
                            sqlx::query(&format!("DELETE FROM {table} WHERE id = ?"))
                                .bind(id.to_string())
                                .execute(&mut *tx)
                                .await?
                        }
                    };

                    if let (Some(expected), 0) = (expected_version, result.rows_affected()) {
                        warn!(table = *table, id = %id, expected, "Version conflict on delete");
                        return Err(StoreError::Concurrency {
                            id: *id,
                            expected: *expected,
                        });
                    }

                    saved_versions.push(((*table, *id), None));
                }
            }
        }

        tx.commit().await?;

        for (key, version) in saved_versions {
            match version {
                Some(version) => {
                    self.loaded_versions.insert(key, version);
                }
                None => {
                    self.loaded_versions.remove(&key);
                }
            }
        }

        let elapsed = started.elapsed();
        if elapsed > self.slow_save_threshold {
            warn!(
                operations = operations.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Slow transaction detected"
            );
        } else {
            debug!(
                operations = operations.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Saved changes"
            );
        }

        Ok(())
    }
}
