//! Stock-out tracking: the consecutive-week counter and the append-only
//! history log.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use aquaflow_core::{DomainResult, LocationId, ProductId};
use aquaflow_replenishment::{StockOutCounter, StockOutEvent};

use crate::store_err;

#[derive(Debug, FromRow)]
struct CounterRow {
    location_id: i64,
    product_id: i64,
    consecutive_weeks: i64,
    last_updated: DateTime<Utc>,
}

impl From<CounterRow> for StockOutCounter {
    fn from(row: CounterRow) -> Self {
        StockOutCounter {
            location_id: LocationId::new(row.location_id),
            product_id: ProductId::new(row.product_id),
            consecutive_weeks: row.consecutive_weeks,
            last_updated: row.last_updated,
        }
    }
}

/// Escalation report row: a counter at or above threshold, enriched with
/// product and location names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ThresholdCounter {
    pub location_id: i64,
    pub product_id: i64,
    pub consecutive_weeks: i64,
    pub last_updated: DateTime<Utc>,
    pub container_type: String,
    pub description: String,
    pub location_name: String,
    pub org_id: i64,
}

#[derive(Clone)]
pub struct CounterStore {
    pool: PgPool,
}

impl CounterStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_counter(
        &self,
        location_id: LocationId,
        product_id: ProductId,
    ) -> DomainResult<Option<StockOutCounter>> {
        let row = sqlx::query_as::<_, CounterRow>(
            r#"
            SELECT location_id, product_id, consecutive_weeks, last_updated
            FROM stock_out_counter
            WHERE location_id = $1 AND product_id = $2
            "#,
        )
        .bind(location_id.as_i64())
        .bind(product_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err("failed to get stock out counter"))?;

        Ok(row.map(StockOutCounter::from))
    }

    pub async fn counters_for_location(
        &self,
        location_id: LocationId,
    ) -> DomainResult<Vec<StockOutCounter>> {
        let rows = sqlx::query_as::<_, CounterRow>(
            r#"
            SELECT location_id, product_id, consecutive_weeks, last_updated
            FROM stock_out_counter
            WHERE location_id = $1
            ORDER BY product_id
            "#,
        )
        .bind(location_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(store_err("failed to get stock out counters"))?;

        Ok(rows.into_iter().map(StockOutCounter::from).collect())
    }

    /// Create at 1 or bump by 1.
    pub async fn increment(
        &self,
        location_id: LocationId,
        product_id: ProductId,
    ) -> DomainResult<StockOutCounter> {
        let row = sqlx::query_as::<_, CounterRow>(
            r#"
            INSERT INTO stock_out_counter (location_id, product_id, consecutive_weeks)
            VALUES ($1, $2, 1)
            ON CONFLICT (location_id, product_id)
            DO UPDATE SET consecutive_weeks = stock_out_counter.consecutive_weeks + 1,
                          last_updated = NOW()
            RETURNING location_id, product_id, consecutive_weeks, last_updated
            "#,
        )
        .bind(location_id.as_i64())
        .bind(product_id.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(store_err("failed to increment stock out counter"))?;

        Ok(row.into())
    }

    /// Create at 0 or reset to 0.
    pub async fn reset(
        &self,
        location_id: LocationId,
        product_id: ProductId,
    ) -> DomainResult<StockOutCounter> {
        let row = sqlx::query_as::<_, CounterRow>(
            r#"
            INSERT INTO stock_out_counter (location_id, product_id, consecutive_weeks)
            VALUES ($1, $2, 0)
            ON CONFLICT (location_id, product_id)
            DO UPDATE SET consecutive_weeks = 0,
                          last_updated = NOW()
            RETURNING location_id, product_id, consecutive_weeks, last_updated
            "#,
        )
        .bind(location_id.as_i64())
        .bind(product_id.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(store_err("failed to reset stock out counter"))?;

        Ok(row.into())
    }

    /// Counters at or above the threshold, for escalation reporting.
    pub async fn threshold_counters(&self, threshold: i64) -> DomainResult<Vec<ThresholdCounter>> {
        sqlx::query_as::<_, ThresholdCounter>(
            r#"
            SELECT soc.location_id, soc.product_id, soc.consecutive_weeks, soc.last_updated,
                   p.container_type, p.description, ol.location_name, ol.org_id
            FROM stock_out_counter soc
            JOIN products p ON soc.product_id = p.product_id
            JOIN org_locations ol ON soc.location_id = ol.location_id
            WHERE soc.consecutive_weeks >= $1
            ORDER BY soc.consecutive_weeks DESC, soc.location_id, soc.product_id
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err("failed to get threshold counters"))
    }
}

#[derive(Debug, FromRow)]
struct HistoryRow {
    location_id: i64,
    product_id: i64,
    stock_out_date: DateTime<Utc>,
}

impl From<HistoryRow> for StockOutEvent {
    fn from(row: HistoryRow) -> Self {
        StockOutEvent {
            location_id: LocationId::new(row.location_id),
            product_id: ProductId::new(row.product_id),
            stock_out_date: row.stock_out_date,
        }
    }
}

/// History report row enriched with product descriptive fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StockOutHistoryItem {
    pub location_id: i64,
    pub product_id: i64,
    pub stock_out_date: DateTime<Utc>,
    pub container_type: String,
    pub description: String,
}

#[derive(Clone)]
pub struct HistoryStore {
    pool: PgPool,
}

impl HistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one stock-out event. Rows are never mutated or deleted.
    pub async fn record_stock_out(
        &self,
        location_id: LocationId,
        product_id: ProductId,
    ) -> DomainResult<StockOutEvent> {
        let row = sqlx::query_as::<_, HistoryRow>(
            r#"
            INSERT INTO stock_out_history (location_id, product_id)
            VALUES ($1, $2)
            RETURNING location_id, product_id, stock_out_date
            "#,
        )
        .bind(location_id.as_i64())
        .bind(product_id.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(store_err("failed to record stock out"))?;

        Ok(row.into())
    }

    /// Events for a location, newest first, optionally bounded by dates.
    pub async fn history_for_location(
        &self,
        location_id: LocationId,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> DomainResult<Vec<StockOutHistoryItem>> {
        sqlx::query_as::<_, StockOutHistoryItem>(
            r#"
            SELECT soh.location_id, soh.product_id, soh.stock_out_date,
                   p.container_type, p.description
            FROM stock_out_history soh
            JOIN products p ON soh.product_id = p.product_id
            WHERE soh.location_id = $1
              AND ($2::timestamptz IS NULL OR soh.stock_out_date >= $2)
              AND ($3::timestamptz IS NULL OR soh.stock_out_date <= $3)
            ORDER BY soh.stock_out_date DESC
            "#,
        )
        .bind(location_id.as_i64())
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err("failed to get stock out history"))
    }

    /// Events for one product at a location, newest first.
    pub async fn history_for_product(
        &self,
        location_id: LocationId,
        product_id: ProductId,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> DomainResult<Vec<StockOutEvent>> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT location_id, product_id, stock_out_date
            FROM stock_out_history
            WHERE location_id = $1 AND product_id = $2
              AND ($3::timestamptz IS NULL OR stock_out_date >= $3)
              AND ($4::timestamptz IS NULL OR stock_out_date <= $4)
            ORDER BY stock_out_date DESC
            "#,
        )
        .bind(location_id.as_i64())
        .bind(product_id.as_i64())
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err("failed to get product stock out history"))?;

        Ok(rows.into_iter().map(StockOutEvent::from).collect())
    }
}
