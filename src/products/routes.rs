use super::handlers;
use axum::{routing::get, Router};

/// Creates the products router with all product-related routes
pub fn products_routes() -> Router {
    Router::new()
        .route(
            "/products",
            get(handlers::get_all_products)
                .post(handlers::create_product)
                .put(handlers::update_product),
        )
        .route(
            "/products/:id",
            get(handlers::get_product_by_id).delete(handlers::delete_product_by_id),
        )
        .route(
            "/products/category/:category",
            get(handlers::get_products_by_category),
        )
}
