// src/products/queries.rs
//! Read-side handlers

use async_trait::async_trait;
use tracing::{info, warn};

use super::models::*;
use crate::common::{ApiError, Mediator, RequestHandler};

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

#[async_trait]
impl RequestHandler<GetAllProductsQuery> for Mediator {
    async fn handle(&self, query: GetAllProductsQuery) -> Result<GetAllProductsResult, ApiError> {
        info!(page = ?query.page, page_size = ?query.page_size, "Starting query all products");

        let session = self.store().lightweight_session();

        let products = if query.page.is_none() && query.page_size.is_none() {
            session.query::<Product>().await?
        } else {
            let page = query.page.unwrap_or(1).max(1);
            let page_size = query
                .page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE);
            session.query_page::<Product>(page, page_size).await?
        };

        Ok(GetAllProductsResult { products })
    }
}

#[async_trait]
impl RequestHandler<GetProductByIdQuery> for Mediator {
    async fn handle(&self, query: GetProductByIdQuery) -> Result<GetProductByIdResult, ApiError> {
        info!(product_id = %query.id, "Starting query product");

        let mut session = self.store().lightweight_session();

        let product = session
            .load::<Product>(query.id)
            .await?
            .ok_or_else(|| {
                warn!(product_id = %query.id, "Product not found");
                ApiError::NotFound(format!("Product not found with ID: {}", query.id))
            })?;

        Ok(GetProductByIdResult { product })
    }
}

#[async_trait]
impl RequestHandler<GetProductsByCategoryQuery> for Mediator {
    async fn handle(
        &self,
        query: GetProductsByCategoryQuery,
    ) -> Result<GetProductsByCategoryResult, ApiError> {
        info!(category = %query.category, "Starting query products by category");

        let products = self
            .store()
            .lightweight_session()
            .query_contains::<Product>("category", &query.category)
            .await?;

        Ok(GetProductsByCategoryResult { products })
    }
}
