// src/common/migrations.rs
//! Document table setup

use tracing::info;

use super::config::Environment;
use crate::products::Product;
use crate::store::{DocumentStore, StoreError};

/// Create missing document tables, or check they exist in production
///
/// Production never changes the schema at startup.
pub async fn run_migrations(
    store: &DocumentStore,
    environment: Environment,
) -> Result<(), StoreError> {
    if environment.is_production() {
        info!("Production mode - verifying existing schema");
        store.verify_schema::<Product>().await?;
    } else {
        store.ensure_schema::<Product>().await?;
    }

    info!("✅ Document schema ready");
    Ok(())
}
