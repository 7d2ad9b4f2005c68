use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(
    Extension(actor): Extension<crate::context::ActorContext>,
) -> impl IntoResponse {
    Json(serde_json::json!({
        "user_id": actor.user_id(),
        "email": actor.email(),
        "role": actor.role().as_str(),
        "org_id": actor.org_id(),
    }))
}
