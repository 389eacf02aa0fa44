use axum::{
    extract::{Extension, Path, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use super::models::*;
use crate::common::{ApiError, AppState};

fn parse_product_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::BadRequest(format!("Invalid product ID: {}", id)))
}

// ============================================================================
// Product Endpoints
// ============================================================================

/// POST /products - Create a product
pub async fn create_product(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = CreateProductCommand::from(request);

    let result = state.mediator.send(command).await?;
    let response = CreateProductResponse::from(result);
    let location = format!("/products/{}", response.id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(response)))
}

/// GET /products - List products, optionally paginated
pub async fn get_all_products(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<GetAllProductsParams>,
) -> Result<Json<GetAllProductsResponse>, ApiError> {
    let result = state
        .mediator
        .send(GetAllProductsQuery::from(params))
        .await?;

    Ok(Json(result.into()))
}

/// GET /products/:id - Get a product by ID
pub async fn get_product_by_id(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GetProductByIdResponse>, ApiError> {
    let id = parse_product_id(&id)?;
    let result = state.mediator.send(GetProductByIdQuery { id }).await?;

    Ok(Json(result.into()))
}

/// GET /products/category/:category - Products tagged with a category
pub async fn get_products_by_category(
    Extension(state): Extension<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<GetProductsByCategoryResponse>, ApiError> {
    let result = state
        .mediator
        .send(GetProductsByCategoryQuery { category })
        .await?;

    Ok(Json(result.into()))
}

/// PUT /products - Update a product at a known version
pub async fn update_product(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<UpdateProductResponse>, ApiError> {
    let result = state
        .mediator
        .send(UpdateProductCommand::from(request))
        .await?;

    Ok(Json(result.into()))
}

/// DELETE /products/:id - Delete a product by ID
pub async fn delete_product_by_id(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteProductByIdResponse>, ApiError> {
    let id = parse_product_id(&id)?;
    let result = state
        .mediator
        .send(DeleteProductByIdCommand { id })
        .await?;

    Ok(Json(result.into()))
}
