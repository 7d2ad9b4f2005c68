//! Environment-driven process configuration.

use std::env;
use std::time::Duration;

/// Everything the binary needs from its environment, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub db_acquire_timeout: Duration,
    /// When set, the weekly generator drives the stock-out counters and
    /// history; otherwise they stay manually-invoked diagnostics.
    pub stock_out_tracking: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            tracing::warn!("DATABASE_URL not set; using local dev default");
            "postgres://localhost/aquaflow".to_string()
        });

        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            database_url,
            jwt_secret,
            db_acquire_timeout: Duration::from_secs(
                parse_or("DB_ACQUIRE_TIMEOUT_SECS", 5),
            ),
            stock_out_tracking: env::var("STOCK_OUT_TRACKING")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}

fn parse_or(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("invalid {key} value '{raw}', using default {default}");
            default
        }),
        Err(_) => default,
    }
}
