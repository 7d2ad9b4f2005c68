use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};

use aquaflow_core::DomainResult;

pub mod notifications;
pub mod replenishment;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/replenishment", replenishment::router())
        .nest("/notifications", notifications::router())
}

/// Map a service result onto the standard 200/error envelope.
pub(crate) fn handle<T: serde::Serialize>(result: DomainResult<T>) -> axum::response::Response {
    match result {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => crate::app::errors::domain_error_to_response(e),
    }
}
