// Application state shared across all modules

use super::cqrs::Mediator;

/// Application state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub mediator: Mediator,
}
