// src/products/commands.rs
//! Write-side handlers: create, update and delete products

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::models::*;
use crate::common::{ApiError, Mediator, RequestHandler, Validatable};
use crate::store::StoreError;

#[async_trait]
impl RequestHandler<CreateProductCommand> for Mediator {
    async fn handle(&self, command: CreateProductCommand) -> Result<CreateProductResult, ApiError> {
        let product = Product::create(&command)?;

        let mut session = self.store().lightweight_session();
        session.store(&product)?;
        session.save_changes().await?;

        info!(
            product_id = %product.id,
            name = %product.name,
            price = product.price,
            categories = %product.category.join(", "),
            "Created product"
        );

        Ok(CreateProductResult { id: product.id })
    }
}

#[async_trait]
impl RequestHandler<UpdateProductCommand> for Mediator {
    async fn handle(&self, command: UpdateProductCommand) -> Result<UpdateProductResult, ApiError> {
        info!(product_id = %command.id, version = command.version, "Starting to update product");

        // Reject a nil id or bad version before touching the store
        command.validate_and_raise()?;

        let mut session = self.store().lightweight_session();

        let mut product = session
            .load::<Product>(command.id)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!("Product not found with ID: {}", command.id))
            })?;

        // Same contract again as the factory's own guard; passes after the check above
        product.update(&command)?;

        // The client's version is the one that must still be current
        session.store_with_version(&product, command.version)?;

        match session.save_changes().await {
            Ok(()) => {}
            Err(StoreError::Concurrency { .. }) => {
                warn!(product_id = %command.id, version = command.version, "Concurrency conflict detected for product");
                return Err(ApiError::Conflict(
                    "The product was modified by another user. Please refresh and try again."
                        .to_string(),
                ));
            }
            Err(e) => {
                error!(product_id = %command.id, error = %e, "Error updating product");
                return Err(e.into());
            }
        }

        info!(product_id = %command.id, "Successfully updated product");

        Ok(UpdateProductResult {
            id: command.id,
            version: command.version + 1,
        })
    }
}

#[async_trait]
impl RequestHandler<DeleteProductByIdCommand> for Mediator {
    async fn handle(
        &self,
        command: DeleteProductByIdCommand,
    ) -> Result<DeleteProductByIdResult, ApiError> {
        info!(product_id = %command.id, "Starting to delete product");

        let mut session = self.store().lightweight_session();

        let product = session
            .load::<Product>(command.id)
            .await?
            .ok_or_else(|| {
                warn!(product_id = %command.id, "Product not found");
                ApiError::NotFound(format!("Product not found with ID: {}", command.id))
            })?;

        session.delete(&product);

        match session.save_changes().await {
            Ok(()) => {}
            Err(StoreError::Concurrency { .. }) => {
                return Err(ApiError::Conflict(
                    "The product was modified by another user. Please refresh and try again."
                        .to_string(),
                ));
            }
            Err(e) => {
                error!(product_id = %command.id, error = %e, "Error deleting product");
                return Err(e.into());
            }
        }

        info!(product_id = %command.id, "Successfully deleted product");

        Ok(DeleteProductByIdResult { is_success: true })
    }
}
