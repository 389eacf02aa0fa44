// Common module - shared types and utilities across all modules

pub mod config;
pub mod cqrs;
pub mod error;
pub mod migrations;
pub mod state;
pub mod validation;

// Re-export commonly used types for convenience
pub use config::{AppConfig, Environment};
pub use cqrs::{Mediator, Request, RequestHandler};
pub use error::ApiError;
pub use state::AppState;
pub use validation::{Validatable, ValidationError, ValidationErrors, ValidationResult};
