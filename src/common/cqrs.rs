// Command/query dispatch

use async_trait::async_trait;
use std::any::type_name;
use std::fmt::Debug;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::ApiError;
use crate::store::DocumentStore;

/// A command or query with exactly one handler
pub trait Request: Debug + Send {
    type Response: Send;
}

#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    async fn handle(&self, request: R) -> Result<R::Response, ApiError>;
}

/// Routes requests to their handler
///
/// Handlers are implemented on `Mediator` itself (`impl RequestHandler<X> for
/// Mediator`), one per request type, next to the request they serve.
#[derive(Debug, Clone)]
pub struct Mediator {
    store: DocumentStore,
}

impl Mediator {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub async fn send<R>(&self, request: R) -> Result<R::Response, ApiError>
    where
        R: Request,
        Self: RequestHandler<R>,
    {
        let request_type = short_type_name::<R>();
        debug!(request = ?request, "Dispatching {}", request_type);

        let started = Instant::now();
        let result = <Self as RequestHandler<R>>::handle(self, request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => info!(elapsed_ms, "{} handled", request_type),
            Err(e) => warn!(elapsed_ms, error = %e, "{} failed", request_type),
        }

        result
    }
}

fn short_type_name<T>() -> &'static str {
    let full = type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
