//! # Products Module
//!
//! This module handles the product catalog:
//! - Product document and request/response mapping
//! - Create and update validation contracts
//! - Command and query handlers dispatched through the mediator
//! - HTTP endpoints

pub mod commands;
pub mod handlers;
pub mod models;
pub mod queries;
pub mod routes;
pub mod validators;

#[cfg(test)]
mod tests;

pub use models::Product;
pub use routes::products_routes;
