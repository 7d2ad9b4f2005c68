//! Replenishment order headers and line items.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use aquaflow_core::{DomainError, DomainResult, LocationId, ReplenishmentId};
use aquaflow_replenishment::{OrderLine, OrderStatus, ReplenishmentOrder};

use crate::store_err;

#[derive(Debug, FromRow)]
struct OrderRow {
    replenishment_id: i64,
    location_id: i64,
    scheduled_date: NaiveDate,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for ReplenishmentOrder {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = OrderStatus::parse(&row.status)
            .map_err(|_| DomainError::dependency(format!("invalid stored order status '{}'", row.status)))?;
        Ok(ReplenishmentOrder {
            replenishment_id: ReplenishmentId::new(row.replenishment_id),
            location_id: LocationId::new(row.location_id),
            scheduled_date: row.scheduled_date,
            status,
            created_at: row.created_at,
        })
    }
}

/// Order header enriched with the delivery location's descriptive fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderWithLocation {
    pub replenishment_id: i64,
    pub location_id: i64,
    pub scheduled_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub location_name: String,
    pub address: String,
    pub org_id: i64,
}

/// Line item joined with product descriptive fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderLineDetail {
    pub replenishment_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub container_type: String,
    pub description: String,
    pub unit_price: i64,
}

#[derive(Clone)]
pub struct OrderStore {
    pool: PgPool,
}

impl OrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert the order header; status defaults to pending.
    pub async fn create_order(
        &self,
        location_id: LocationId,
        scheduled_date: NaiveDate,
    ) -> DomainResult<ReplenishmentOrder> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            INSERT INTO replenishment_order (location_id, scheduled_date)
            VALUES ($1, $2)
            RETURNING replenishment_id, location_id, scheduled_date, status, created_at
            "#,
        )
        .bind(location_id.as_i64())
        .bind(scheduled_date)
        .fetch_one(&self.pool)
        .await
        .map_err(store_err("failed to create replenishment order"))?;

        row.try_into()
    }

    /// Bulk-insert line items for an order. Quantities are validated by the
    /// caller; the statement binds parallel arrays so the insert stays a
    /// single parameterized round trip.
    pub async fn add_order_lines(
        &self,
        replenishment_id: ReplenishmentId,
        lines: &[OrderLine],
    ) -> DomainResult<u64> {
        if lines.is_empty() {
            return Ok(0);
        }

        let product_ids: Vec<i64> = lines.iter().map(|l| l.product_id.as_i64()).collect();
        let quantities: Vec<i64> = lines.iter().map(|l| l.quantity).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO replenishment_details (replenishment_id, product_id, quantity)
            SELECT $1, product_id, quantity
            FROM UNNEST($2::bigint[], $3::bigint[]) AS t(product_id, quantity)
            "#,
        )
        .bind(replenishment_id.as_i64())
        .bind(&product_ids)
        .bind(&quantities)
        .execute(&self.pool)
        .await
        .map_err(store_err("failed to add replenishment details"))?;

        Ok(result.rows_affected())
    }

    /// Bare order header.
    pub async fn get_order(
        &self,
        replenishment_id: ReplenishmentId,
    ) -> DomainResult<Option<ReplenishmentOrder>> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT replenishment_id, location_id, scheduled_date, status, created_at
            FROM replenishment_order
            WHERE replenishment_id = $1
            "#,
        )
        .bind(replenishment_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err("failed to get replenishment order"))?;

        match row {
            Some(row) => Ok(Some(row.try_into()?)),
            None => Ok(None),
        }
    }

    /// Order header with location enrichment.
    pub async fn get_order_with_location(
        &self,
        replenishment_id: ReplenishmentId,
    ) -> DomainResult<Option<OrderWithLocation>> {
        sqlx::query_as::<_, OrderWithLocation>(
            r#"
            SELECT ro.replenishment_id, ro.location_id, ro.scheduled_date, ro.status,
                   ro.created_at, ol.location_name, ol.address, ol.org_id
            FROM replenishment_order ro
            JOIN org_locations ol ON ro.location_id = ol.location_id
            WHERE ro.replenishment_id = $1
            "#,
        )
        .bind(replenishment_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err("failed to get replenishment order"))
    }

    /// Line items with product enrichment.
    pub async fn order_lines(
        &self,
        replenishment_id: ReplenishmentId,
    ) -> DomainResult<Vec<OrderLineDetail>> {
        sqlx::query_as::<_, OrderLineDetail>(
            r#"
            SELECT rd.replenishment_id, rd.product_id, rd.quantity,
                   p.container_type, p.description, p.unit_price
            FROM replenishment_details rd
            JOIN products p ON rd.product_id = p.product_id
            WHERE rd.replenishment_id = $1
            ORDER BY rd.product_id
            "#,
        )
        .bind(replenishment_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(store_err("failed to get replenishment details"))
    }

    /// All orders for a location, most recently scheduled first.
    pub async fn orders_for_location(
        &self,
        location_id: LocationId,
    ) -> DomainResult<Vec<ReplenishmentOrder>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT replenishment_id, location_id, scheduled_date, status, created_at
            FROM replenishment_order
            WHERE location_id = $1
            ORDER BY scheduled_date DESC
            "#,
        )
        .bind(location_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(store_err("failed to get replenishment orders"))?;

        rows.into_iter().map(ReplenishmentOrder::try_from).collect()
    }

    /// Every pending order across locations, soonest scheduled first.
    pub async fn pending_orders(&self) -> DomainResult<Vec<OrderWithLocation>> {
        sqlx::query_as::<_, OrderWithLocation>(
            r#"
            SELECT ro.replenishment_id, ro.location_id, ro.scheduled_date, ro.status,
                   ro.created_at, ol.location_name, ol.address, ol.org_id
            FROM replenishment_order ro
            JOIN org_locations ol ON ro.location_id = ol.location_id
            WHERE ro.status = 'pending'
            ORDER BY ro.scheduled_date ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err("failed to get pending replenishment orders"))
    }

    /// Set the order status; the row must exist.
    pub async fn update_status(
        &self,
        replenishment_id: ReplenishmentId,
        status: OrderStatus,
    ) -> DomainResult<ReplenishmentOrder> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            UPDATE replenishment_order
            SET status = $2
            WHERE replenishment_id = $1
            RETURNING replenishment_id, location_id, scheduled_date, status, created_at
            "#,
        )
        .bind(replenishment_id.as_i64())
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err("failed to update replenishment order status"))?;

        row.ok_or(DomainError::NotFound)?.try_into()
    }
}
