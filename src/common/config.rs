// src/common/config.rs
//! Application configuration loaded from environment variables

use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub environment: Environment,
    pub cors_origins: Vec<String>,
    pub slow_request_ms: u64,
    pub very_slow_request_ms: u64,
    pub slow_save_ms: u64,
    pub command_timeout: Duration,
    pub sentry_dsn: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://catalog.db".to_string(),
            port: 8080,
            environment: Environment::Development,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
            slow_request_ms: 500,
            very_slow_request_ms: 1000,
            slow_save_ms: 100,
            command_timeout: Duration::from_secs(30),
            sentry_dsn: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup; unset or unparsable values keep defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            config.database_url = url;
        }

        if let Some(env_name) = lookup("APP_ENV") {
            config.environment = Environment::parse(&env_name);
        }

        if let Some(origins) = lookup("CORS_ORIGINS") {
            config.cors_origins = origins
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect();
        }

        config.port = parse_or(&lookup, "PORT", config.port);
        config.slow_request_ms = parse_or(&lookup, "SLOW_REQUEST_MS", config.slow_request_ms);
        config.very_slow_request_ms =
            parse_or(&lookup, "VERY_SLOW_REQUEST_MS", config.very_slow_request_ms);
        config.slow_save_ms = parse_or(&lookup, "SLOW_SAVE_MS", config.slow_save_ms);
        config.command_timeout = Duration::from_secs(parse_or(
            &lookup,
            "DB_COMMAND_TIMEOUT_SECS",
            config.command_timeout.as_secs(),
        ));

        config.sentry_dsn = lookup("SENTRY_DSN").filter(|dsn| !dsn.trim().is_empty());

        config
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|value| value.trim().parse::<T>().ok())
        .unwrap_or(default)
}
