use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};

use aquaflow_auth::Capability;
use aquaflow_core::{LocationId, NotificationId, OrgId, ProductId};
use aquaflow_notify::NewNotification;

use crate::app::routes::handle;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz::require_capability;
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new()
        .route("/send", post(send_notification))
        .route("/org/:org_id", get(org_notifications))
        .route("/location/:location_id", get(location_notifications))
        .route("/unread-count", get(unread_count))
        .route("/read-all", put(mark_all_read))
        .route("/:notification_id/read", put(mark_read))
        .route("/:notification_id", delete(delete_notification))
}

pub async fn send_notification(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Json(body): Json<dto::SendNotificationRequest>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&actor, Capability::ManageNotifications) {
        return resp;
    }

    let notification = NewNotification {
        org_id: OrgId::new(body.org_id),
        location_id: body.location_id.map(LocationId::new),
        product_id: body.product_id.map(ProductId::new),
        subject: body.subject,
        message: body.message,
        sent_to: body.sent_to,
    };

    match services.send_notification(notification).await {
        Ok(id) => (
            StatusCode::OK,
            Json(serde_json::json!({ "notification_id": id })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn org_notifications(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(org_id): Path<i64>,
) -> axum::response::Response {
    let org_id = OrgId::new(org_id);

    // Admins can read any organization's notifications; everyone else only
    // their own organization's.
    if !actor.role().is_admin() && actor.org_id() != org_id {
        return errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "not authorized for this organization",
        );
    }

    handle(services.notifications.for_org(org_id).await)
}

pub async fn location_notifications(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(location_id): Path<i64>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&actor, Capability::ViewReports) {
        return resp;
    }

    handle(
        services
            .notifications
            .for_location(LocationId::new(location_id))
            .await,
    )
}

pub async fn unread_count(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
) -> axum::response::Response {
    match services.notifications.unread_count(actor.email()).await {
        Ok(count) => (
            StatusCode::OK,
            Json(serde_json::json!({ "count": count })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn mark_read(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(notification_id): Path<i64>,
) -> axum::response::Response {
    let id = NotificationId::new(notification_id);

    match require_addressee(&services, &actor, id).await {
        Ok(()) => {}
        Err(resp) => return resp,
    }

    match services.notifications.mark_read(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn mark_all_read(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
) -> axum::response::Response {
    match services.notifications.mark_all_read(actor.email()).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(serde_json::json!({ "updated": updated })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_notification(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(notification_id): Path<i64>,
) -> axum::response::Response {
    let id = NotificationId::new(notification_id);

    match require_addressee(&services, &actor, id).await {
        Ok(()) => {}
        Err(resp) => return resp,
    }

    match services.notifications.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Only the addressee may mutate a notification, admin or not.
async fn require_addressee(
    services: &AppServices,
    actor: &ActorContext,
    notification_id: NotificationId,
) -> Result<(), axum::response::Response> {
    match services.notifications.get(notification_id).await {
        Ok(Some(notification)) if notification.sent_to == actor.email() => Ok(()),
        Ok(Some(_)) => Err(errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "not authorized to update this notification",
        )),
        Ok(None) => Err(errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "notification not found",
        )),
        Err(e) => Err(errors::domain_error_to_response(e)),
    }
}
