//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: store/dispatcher wiring and the multi-step operations
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use aquaflow_store::PgPool;

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(config: &AppConfig, pool: PgPool) -> Router {
    let validator = Arc::new(aquaflow_auth::Hs256TokenValidator::new(
        config.jwt_secret.as_bytes(),
    ));
    let auth_state = middleware::AuthState { validator };

    let services = Arc::new(services::build_services(pool, config.stock_out_tracking));

    // Protected routes: require a verified bearer token.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new())
}
