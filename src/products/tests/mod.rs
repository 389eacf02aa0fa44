mod mediator_tests;

use crate::common::{AppState, Mediator};
use crate::products::models::{CreateProductCommand, UpdateProductCommand};
use crate::products::Product;
use crate::store::test_support::memory_pool;
use crate::store::{DocumentStore, StoreOptions};
use std::sync::Arc;
use uuid::Uuid;

pub(super) fn widget_command() -> CreateProductCommand {
    CreateProductCommand {
        name: "Widget".to_string(),
        description: "A widget.".to_string(),
        image_file: "widget.png".to_string(),
        price: 9.99,
        category: vec!["Tools".to_string()],
    }
}

pub(super) fn update_command(id: Uuid, version: u32) -> UpdateProductCommand {
    UpdateProductCommand {
        id,
        version,
        name: "Widget Pro".to_string(),
        description: "A better widget.".to_string(),
        image_file: "widget-pro.jpg".to_string(),
        price: 19.99,
        category: vec!["Tools".to_string(), "Premium".to_string()],
    }
}

pub(super) async fn test_mediator() -> Mediator {
    let store = DocumentStore::new(memory_pool().await, StoreOptions::default());
    store.ensure_schema::<Product>().await.unwrap();
    Mediator::new(store)
}

pub(super) async fn test_state() -> Arc<AppState> {
    Arc::new(AppState {
        mediator: test_mediator().await,
    })
}
