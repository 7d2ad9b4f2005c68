use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use aquaflow_store::{OrderLineDetail, OrderWithLocation};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct OrderLineRequest {
    pub product_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub location_id: i64,
    pub scheduled_date: NaiveDate,
    pub products: Vec<OrderLineRequest>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStockLevelsRequest {
    pub current_level: i64,
    pub target_level: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCurrentLevelRequest {
    pub current_level: i64,
}

#[derive(Debug, Deserialize)]
pub struct SendNotificationRequest {
    pub org_id: i64,
    pub location_id: Option<i64>,
    pub product_id: Option<i64>,
    pub subject: String,
    pub message: String,
    pub sent_to: String,
}

#[derive(Debug, Deserialize)]
pub struct LowStockQuery {
    pub location_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ThresholdQuery {
    pub threshold: Option<i64>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn order_with_lines_to_json(
    order: OrderWithLocation,
    lines: Vec<OrderLineDetail>,
) -> serde_json::Value {
    serde_json::json!({
        "replenishment_id": order.replenishment_id,
        "location_id": order.location_id,
        "location_name": order.location_name,
        "address": order.address,
        "org_id": order.org_id,
        "scheduled_date": order.scheduled_date,
        "status": order.status,
        "created_at": order.created_at,
        "lines": lines,
    })
}
