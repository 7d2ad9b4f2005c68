//! Stock level ledger: per-(location, product) current/target records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use aquaflow_core::{DomainError, DomainResult, LocationId, ProductId};
use aquaflow_replenishment::StockLevel;

use crate::store_err;

#[derive(Debug, FromRow)]
struct LevelRow {
    location_id: i64,
    product_id: i64,
    current_level: i64,
    target_level: i64,
    last_updated: DateTime<Utc>,
}

impl From<LevelRow> for StockLevel {
    fn from(row: LevelRow) -> Self {
        StockLevel {
            location_id: LocationId::new(row.location_id),
            product_id: ProductId::new(row.product_id),
            current_level: row.current_level,
            target_level: row.target_level,
            last_updated: row.last_updated,
        }
    }
}

/// Level record enriched with product descriptive fields for display.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StockLevelDetail {
    pub location_id: i64,
    pub product_id: i64,
    pub current_level: i64,
    pub target_level: i64,
    pub last_updated: DateTime<Utc>,
    pub container_type: String,
    pub description: String,
}

/// Low-stock report row, additionally carrying the location name and owning
/// organization.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LowStockItem {
    pub location_id: i64,
    pub product_id: i64,
    pub current_level: i64,
    pub target_level: i64,
    pub last_updated: DateTime<Utc>,
    pub container_type: String,
    pub description: String,
    pub location_name: String,
    pub org_id: i64,
}

#[derive(Clone)]
pub struct LevelStore {
    pool: PgPool,
}

impl LevelStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch one enriched level record.
    pub async fn get_level(
        &self,
        location_id: LocationId,
        product_id: ProductId,
    ) -> DomainResult<Option<StockLevelDetail>> {
        sqlx::query_as::<_, StockLevelDetail>(
            r#"
            SELECT rl.location_id, rl.product_id, rl.current_level, rl.target_level,
                   rl.last_updated, p.container_type, p.description
            FROM replenishment_levels rl
            JOIN products p ON rl.product_id = p.product_id
            WHERE rl.location_id = $1 AND rl.product_id = $2
            "#,
        )
        .bind(location_id.as_i64())
        .bind(product_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err("failed to get replenishment level"))
    }

    /// All enriched level records for a location.
    pub async fn levels_for_location(
        &self,
        location_id: LocationId,
    ) -> DomainResult<Vec<StockLevelDetail>> {
        sqlx::query_as::<_, StockLevelDetail>(
            r#"
            SELECT rl.location_id, rl.product_id, rl.current_level, rl.target_level,
                   rl.last_updated, p.container_type, p.description
            FROM replenishment_levels rl
            JOIN products p ON rl.product_id = p.product_id
            WHERE rl.location_id = $1
            ORDER BY rl.product_id
            "#,
        )
        .bind(location_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(store_err("failed to get replenishment levels"))
    }

    /// Bare level records for a location, as the weekly planner consumes them.
    pub async fn levels_for_planning(
        &self,
        location_id: LocationId,
    ) -> DomainResult<Vec<StockLevel>> {
        let rows = sqlx::query_as::<_, LevelRow>(
            r#"
            SELECT location_id, product_id, current_level, target_level, last_updated
            FROM replenishment_levels
            WHERE location_id = $1
            ORDER BY product_id
            "#,
        )
        .bind(location_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(store_err("failed to get replenishment levels"))?;

        Ok(rows.into_iter().map(StockLevel::from).collect())
    }

    /// Create or update the record for a (location, product) key.
    pub async fn set_level(
        &self,
        location_id: LocationId,
        product_id: ProductId,
        target_level: i64,
        current_level: i64,
    ) -> DomainResult<StockLevel> {
        let row = sqlx::query_as::<_, LevelRow>(
            r#"
            INSERT INTO replenishment_levels (location_id, product_id, target_level, current_level)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (location_id, product_id)
            DO UPDATE SET target_level = EXCLUDED.target_level,
                          current_level = EXCLUDED.current_level,
                          last_updated = NOW()
            RETURNING location_id, product_id, current_level, target_level, last_updated
            "#,
        )
        .bind(location_id.as_i64())
        .bind(product_id.as_i64())
        .bind(target_level)
        .bind(current_level)
        .fetch_one(&self.pool)
        .await
        .map_err(store_err("failed to set replenishment level"))?;

        Ok(row.into())
    }

    /// Update only the current level; the row must already exist.
    pub async fn update_current_level(
        &self,
        location_id: LocationId,
        product_id: ProductId,
        current_level: i64,
    ) -> DomainResult<StockLevel> {
        let row = sqlx::query_as::<_, LevelRow>(
            r#"
            UPDATE replenishment_levels
            SET current_level = $3, last_updated = NOW()
            WHERE location_id = $1 AND product_id = $2
            RETURNING location_id, product_id, current_level, target_level, last_updated
            "#,
        )
        .bind(location_id.as_i64())
        .bind(product_id.as_i64())
        .bind(current_level)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err("failed to update current level"))?;

        row.map(StockLevel::from).ok_or(DomainError::NotFound)
    }

    /// Rows where current sits strictly below target, optionally scoped to
    /// one location.
    pub async fn low_stock_items(
        &self,
        location_id: Option<LocationId>,
    ) -> DomainResult<Vec<LowStockItem>> {
        sqlx::query_as::<_, LowStockItem>(
            r#"
            SELECT rl.location_id, rl.product_id, rl.current_level, rl.target_level,
                   rl.last_updated, p.container_type, p.description,
                   ol.location_name, ol.org_id
            FROM replenishment_levels rl
            JOIN products p ON rl.product_id = p.product_id
            JOIN org_locations ol ON rl.location_id = ol.location_id
            WHERE rl.current_level < rl.target_level
              AND ($1::bigint IS NULL OR rl.location_id = $1)
            ORDER BY rl.location_id, rl.product_id
            "#,
        )
        .bind(location_id.map(|l| l.as_i64()))
        .fetch_all(&self.pool)
        .await
        .map_err(store_err("failed to get low stock items"))
    }

    /// Remove the record for a (location, product) key.
    pub async fn delete_level(
        &self,
        location_id: LocationId,
        product_id: ProductId,
    ) -> DomainResult<()> {
        let result = sqlx::query(
            "DELETE FROM replenishment_levels WHERE location_id = $1 AND product_id = $2",
        )
        .bind(location_id.as_i64())
        .bind(product_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(store_err("failed to delete replenishment level"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }
}
