// src/monitoring_middleware.rs
//! Middleware that times requests and flags slow endpoints

use axum::{
    extract::{Extension, MatchedPath, Request},
    http::Method,
    middleware::Next,
    response::Response,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::common::AppConfig;

/// Samples kept per endpoint
pub const MAX_SAMPLES: usize = 100;

/// Shared key for requests that matched no route
pub const UNMATCHED_ENDPOINT: &str = "<unmatched>";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingStats {
    pub avg_ms: f64,
    pub min_ms: u64,
    pub max_ms: u64,
    pub count: usize,
}

impl TimingStats {
    fn from_samples(samples: &VecDeque<u64>) -> Self {
        let count = samples.len();
        let total: u64 = samples.iter().sum();

        Self {
            avg_ms: if count == 0 { 0.0 } else { total as f64 / count as f64 },
            min_ms: samples.iter().copied().min().unwrap_or(0),
            max_ms: samples.iter().copied().max().unwrap_or(0),
            count,
        }
    }
}

/// Rolling request timings keyed by "METHOD route"
///
/// Keys come from route templates, so the map holds at most one entry per
/// route and method plus `UNMATCHED_ENDPOINT`.
#[derive(Debug)]
pub struct RequestTimings {
    samples: RwLock<HashMap<String, VecDeque<u64>>>,
    slow_ms: u64,
    very_slow_ms: u64,
}

impl RequestTimings {
    pub fn new(slow_ms: u64, very_slow_ms: u64) -> Self {
        Self {
            samples: RwLock::new(HashMap::new()),
            slow_ms,
            very_slow_ms,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.slow_request_ms, config.very_slow_request_ms)
    }

    /// Add a sample, dropping the oldest past `MAX_SAMPLES`
    pub async fn record(&self, endpoint: &str, elapsed_ms: u64) -> TimingStats {
        let mut samples = self.samples.write().await;
        let entry = samples.entry(endpoint.to_string()).or_default();

        entry.push_back(elapsed_ms);
        if entry.len() > MAX_SAMPLES {
            entry.pop_front();
        }

        TimingStats::from_samples(entry)
    }

    #[cfg(test)]
    async fn endpoint_count(&self) -> usize {
        self.samples.read().await.len()
    }
}

/// "METHOD /route/:param" for matched requests
fn endpoint_key(method: &Method, matched_path: Option<&MatchedPath>) -> String {
    match matched_path {
        Some(route) => format!("{} {}", method, route.as_str()),
        None => UNMATCHED_ENDPOINT.to_string(),
    }
}

/// Times every request and logs the slow ones
pub async fn request_monitoring(
    Extension(timings): Extension<Arc<RequestTimings>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let endpoint = endpoint_key(&method, request.extensions().get::<MatchedPath>());

    let started = Instant::now();
    let response = next.run(request).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let stats = timings.record(&endpoint, elapsed_ms).await;

    if elapsed_ms > timings.very_slow_ms {
        warn!(endpoint = %endpoint, elapsed_ms, "Very slow request");
        if stats.count > 1 {
            warn!(
                endpoint = %endpoint,
                avg_ms = stats.avg_ms,
                min_ms = stats.min_ms,
                max_ms = stats.max_ms,
                count = stats.count,
                "Endpoint timing stats"
            );
        }
    } else if elapsed_ms > timings.slow_ms {
        info!(endpoint = %endpoint, elapsed_ms, "Slow request");
    }

    if path.contains("/products") {
        debug!(
            method = %method,
            path = %path,
            elapsed_ms,
            status = response.status().as_u16(),
            "Products endpoint performance"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{AppState, Mediator};
    use crate::products::{products_routes, Product};
    use crate::store::test_support::memory_pool;
    use crate::store::{DocumentStore, StoreOptions};
    use axum::{middleware, Router};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    async fn serve_products(timings: Arc<RequestTimings>) -> std::net::SocketAddr {
        let store = DocumentStore::new(memory_pool().await, StoreOptions::default());
        store.ensure_schema::<Product>().await.unwrap();
        let state = Arc::new(AppState {
            mediator: Mediator::new(store),
        });

        let app = Router::new()
            .merge(products_routes())
            .layer(middleware::from_fn(request_monitoring))
            .layer(Extension(timings))
            .layer(Extension(state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service()).await.unwrap();
        });
        addr
    }

    async fn get_status_line(addr: std::net::SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();
        String::from_utf8_lossy(&raw)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    }

    #[tokio::test]
    async fn test_timings_are_keyed_by_route_template() {
        let timings = Arc::new(RequestTimings::new(500, 1000));
        let addr = serve_products(timings.clone()).await;

        for i in 0..200 {
            let status = get_status_line(addr, &format!("/products/junk-{i}")).await;
            assert!(status.contains("400"), "{status}");
        }
        for i in 0..50 {
            let status = get_status_line(addr, &format!("/no-such-route/{i}")).await;
            assert!(status.contains("404"), "{status}");
        }

        assert_eq!(timings.endpoint_count().await, 2);

        let by_id = timings.record("GET /products/:id", 0).await;
        assert_eq!(by_id.count, MAX_SAMPLES);
        let unmatched = timings.record(UNMATCHED_ENDPOINT, 0).await;
        assert_eq!(unmatched.count, 51);
    }

    #[test]
    fn test_endpoint_key_without_route_is_shared() {
        assert_eq!(endpoint_key(&Method::GET, None), UNMATCHED_ENDPOINT);
        assert_eq!(endpoint_key(&Method::DELETE, None), UNMATCHED_ENDPOINT);
    }

    #[tokio::test]
    async fn test_record_reports_stats() {
        let timings = RequestTimings::new(500, 1000);

        timings.record("GET /products", 10).await;
        timings.record("GET /products", 30).await;
        let stats = timings.record("GET /products", 20).await;

        assert_eq!(
            stats,
            TimingStats {
                avg_ms: 20.0,
                min_ms: 10,
                max_ms: 30,
                count: 3,
            }
        );

        let other = timings.record("DELETE /products/1", 5).await;
        assert_eq!(other.count, 1);
    }

    #[test]
    fn test_thresholds_come_from_config() {
        let config = AppConfig {
            slow_request_ms: 250,
            very_slow_request_ms: 750,
            ..AppConfig::default()
        };

        let timings = RequestTimings::from_config(&config);
        assert_eq!(timings.slow_ms, 250);
        assert_eq!(timings.very_slow_ms, 750);
    }

    #[tokio::test]
    async fn test_record_keeps_last_hundred_samples() {
        let timings = RequestTimings::new(500, 1000);

        let mut stats = timings.record("GET /products", 0).await;
        for ms in 1..150u64 {
            stats = timings.record("GET /products", ms).await;
        }

        assert_eq!(stats.count, MAX_SAMPLES);
        assert_eq!(stats.min_ms, 50);
        assert_eq!(stats.max_ms, 149);
    }
}
