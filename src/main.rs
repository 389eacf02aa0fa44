// src/main.rs
use axum::{extract::Extension, middleware, Router};
use dotenv::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::PathBuf;
use std::time::Duration;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod common;
mod monitoring_middleware;
mod products;
mod store;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use common::{AppConfig, AppState, Mediator};
use monitoring_middleware::{request_monitoring, RequestTimings};
use store::{DocumentStore, StoreOptions};

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env();

    // Held for the life of the process so buffered events are flushed on exit
    let _sentry_guard = init_sentry(&config);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(sentry_tracing::layer())
        .init();

    info!(environment = config.environment.as_str(), "Starting catalog API");

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    create_database_dir(&config.database_url).await?;

    let connect_options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .busy_timeout(config.command_timeout);
    let pool = SqlitePoolOptions::new()
        .acquire_timeout(config.command_timeout)
        .connect_with(connect_options)
        .await?;

    let store = DocumentStore::new(
        pool,
        StoreOptions {
            slow_save_threshold: Duration::from_millis(config.slow_save_ms),
        },
    );

    common::migrations::run_migrations(&store, config.environment).await?;

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let timings = Arc::new(RequestTimings::from_config(&config));
    let shared = Arc::new(AppState {
        mediator: Mediator::new(store),
    });

    // ========================================================================
    // ROUTER COMPOSITION
    // ========================================================================

    let mut app = Router::new().merge(products::products_routes());

    if !config.environment.is_production() {
        app = app.layer(middleware::from_fn(request_monitoring));
        info!("Request monitoring enabled");
    }

    let app = app
        .layer(Extension(timings))
        .layer(Extension(shared))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http());

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn init_sentry(config: &AppConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_deref()?;

    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(config.environment.as_str().into()),
            ..Default::default()
        },
    )))
}

/// Create the directory holding a file-backed SQLite database
async fn create_database_dir(database_url: &str) -> anyhow::Result<()> {
    let Some(path_part) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };

    let path_without_params = path_part.split('?').next().unwrap_or("");
    if path_without_params.is_empty() || path_without_params.starts_with(':') {
        return Ok(());
    }

    if let Some(parent) = PathBuf::from(path_without_params).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    Ok(())
}

fn cors_layer(cors_origins: &[String]) -> CorsLayer {
    let origins: Vec<axum::http::HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderName::from_static("x-request-id"),
        ])
}
