use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use aquaflow_core::DomainError;

/// Map a domain failure onto the HTTP taxonomy: validation → 400,
/// missing row → 404, capability failure → 403, store/transport → 500.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Unauthorized => json_error(StatusCode::FORBIDDEN, "forbidden", "forbidden"),
        DomainError::Dependency(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "dependency_failure", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
