use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Document {id} was modified concurrently (expected version {expected})")]
    Concurrency { id: Uuid, expected: u32 },

    #[error("Document table '{0}' does not exist")]
    SchemaMissing(String),
}
