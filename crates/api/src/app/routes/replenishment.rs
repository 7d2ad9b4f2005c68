use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post, put},
};
use chrono::Utc;

use aquaflow_auth::Capability;
use aquaflow_core::{LocationId, ProductId, ReplenishmentId};
use aquaflow_replenishment::DEFAULT_ESCALATION_THRESHOLD;

use crate::app::routes::handle;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz::require_capability;
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_order))
        .route("/generate", post(generate_weekly_orders))
        .route("/pending", get(pending_orders))
        .route("/status/:location_id", get(orders_for_location))
        .route("/low-stock", get(low_stock_items))
        .route("/stock/:location_id", get(levels_for_location))
        .route(
            "/stock/:location_id/:product_id",
            get(get_level).put(update_stock_levels).delete(delete_level),
        )
        .route(
            "/stock/:location_id/:product_id/current",
            patch(update_current_level),
        )
        .route("/stock-out/:location_id", get(stock_out_history))
        .route(
            "/stock-out/:location_id/:product_id",
            get(product_stock_out_history),
        )
        .route("/stock-out-counters", get(threshold_counters))
        .route("/stock-out-counter/:location_id", get(counters_for_location))
        .route(
            "/stock-out-counter/:location_id/:product_id/increment",
            post(increment_counter),
        )
        .route(
            "/stock-out-counter/:location_id/:product_id/reset",
            post(reset_counter),
        )
        .route("/:replenishment_id", get(get_order))
        .route("/:replenishment_id/complete", put(complete_order))
}

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Json(body): Json<dto::CreateOrderRequest>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&actor, Capability::ManageReplenishment) {
        return resp;
    }

    let products = body
        .products
        .into_iter()
        .map(|line| (ProductId::new(line.product_id), line.quantity))
        .collect();

    match services
        .create_order(
            LocationId::new(body.location_id),
            body.scheduled_date,
            products,
        )
        .await
    {
        Ok((order, line_count)) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "order": order,
                "line_count": line_count,
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn generate_weekly_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&actor, Capability::ManageReplenishment) {
        return resp;
    }

    handle(services.generate_weekly_orders(Utc::now().date_naive()).await)
}

pub async fn pending_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&actor, Capability::ViewReports) {
        return resp;
    }

    handle(services.orders.pending_orders().await)
}

pub async fn orders_for_location(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(location_id): Path<i64>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&actor, Capability::ViewReports) {
        return resp;
    }

    handle(
        services
            .orders
            .orders_for_location(LocationId::new(location_id))
            .await,
    )
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(replenishment_id): Path<i64>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&actor, Capability::ViewReports) {
        return resp;
    }

    let id = ReplenishmentId::new(replenishment_id);
    let order = match services.orders.get_order_with_location(id).await {
        Ok(Some(order)) => order,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "order not found"),
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.orders.order_lines(id).await {
        Ok(lines) => (
            StatusCode::OK,
            Json(dto::order_with_lines_to_json(order, lines)),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn complete_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(replenishment_id): Path<i64>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&actor, Capability::ManageReplenishment) {
        return resp;
    }

    handle(
        services
            .complete_order(&actor, ReplenishmentId::new(replenishment_id))
            .await,
    )
}

pub async fn get_level(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path((location_id, product_id)): Path<(i64, i64)>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&actor, Capability::ViewReports) {
        return resp;
    }

    match services
        .levels
        .get_level(LocationId::new(location_id), ProductId::new(product_id))
        .await
    {
        Ok(Some(level)) => (StatusCode::OK, Json(level)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "level not found"),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn levels_for_location(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(location_id): Path<i64>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&actor, Capability::ViewReports) {
        return resp;
    }

    handle(
        services
            .levels
            .levels_for_location(LocationId::new(location_id))
            .await,
    )
}

pub async fn update_stock_levels(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path((location_id, product_id)): Path<(i64, i64)>,
    Json(body): Json<dto::UpdateStockLevelsRequest>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&actor, Capability::ManageReplenishment) {
        return resp;
    }

    handle(
        services
            .set_stock_levels(
                &actor,
                LocationId::new(location_id),
                ProductId::new(product_id),
                body.current_level,
                body.target_level,
            )
            .await,
    )
}

pub async fn update_current_level(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path((location_id, product_id)): Path<(i64, i64)>,
    Json(body): Json<dto::UpdateCurrentLevelRequest>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&actor, Capability::ManageReplenishment) {
        return resp;
    }

    handle(
        services
            .update_current_level(
                &actor,
                LocationId::new(location_id),
                ProductId::new(product_id),
                body.current_level,
            )
            .await,
    )
}

pub async fn delete_level(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path((location_id, product_id)): Path<(i64, i64)>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&actor, Capability::ManageReplenishment) {
        return resp;
    }

    match services
        .levels
        .delete_level(LocationId::new(location_id), ProductId::new(product_id))
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn low_stock_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Query(query): Query<dto::LowStockQuery>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&actor, Capability::ViewReports) {
        return resp;
    }

    handle(
        services
            .levels
            .low_stock_items(query.location_id.map(LocationId::new))
            .await,
    )
}

pub async fn stock_out_history(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(location_id): Path<i64>,
    Query(query): Query<dto::HistoryQuery>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&actor, Capability::ViewReports) {
        return resp;
    }

    handle(
        services
            .history
            .history_for_location(LocationId::new(location_id), query.start_date, query.end_date)
            .await,
    )
}

pub async fn product_stock_out_history(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path((location_id, product_id)): Path<(i64, i64)>,
    Query(query): Query<dto::HistoryQuery>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&actor, Capability::ViewReports) {
        return resp;
    }

    handle(
        services
            .history
            .history_for_product(
                LocationId::new(location_id),
                ProductId::new(product_id),
                query.start_date,
                query.end_date,
            )
            .await,
    )
}

pub async fn threshold_counters(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Query(query): Query<dto::ThresholdQuery>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&actor, Capability::ViewReports) {
        return resp;
    }

    let threshold = query.threshold.unwrap_or(DEFAULT_ESCALATION_THRESHOLD);
    handle(services.counters.threshold_counters(threshold).await)
}

pub async fn counters_for_location(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(location_id): Path<i64>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&actor, Capability::ViewReports) {
        return resp;
    }

    handle(
        services
            .counters
            .counters_for_location(LocationId::new(location_id))
            .await,
    )
}

pub async fn increment_counter(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path((location_id, product_id)): Path<(i64, i64)>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&actor, Capability::ManageReplenishment) {
        return resp;
    }

    handle(
        services
            .counters
            .increment(LocationId::new(location_id), ProductId::new(product_id))
            .await,
    )
}

pub async fn reset_counter(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path((location_id, product_id)): Path<(i64, i64)>,
) -> axum::response::Response {
    if let Err(resp) = require_capability(&actor, Capability::ManageReplenishment) {
        return resp;
    }

    handle(
        services
            .counters
            .reset(LocationId::new(location_id), ProductId::new(product_id))
            .await,
    )
}
