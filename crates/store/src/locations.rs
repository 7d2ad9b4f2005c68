//! Organization delivery locations (read-only join target; the weekly
//! generator iterates them).

use serde::Serialize;
use sqlx::{FromRow, PgPool};

use aquaflow_core::DomainResult;

use crate::store_err;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrgLocation {
    pub location_id: i64,
    pub org_id: i64,
    pub location_name: String,
    pub address: String,
    pub delivery_day: String,
}

#[derive(Clone)]
pub struct LocationStore {
    pool: PgPool,
}

impl LocationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn all(&self) -> DomainResult<Vec<OrgLocation>> {
        sqlx::query_as::<_, OrgLocation>(
            r#"
            SELECT location_id, org_id, location_name, address, delivery_day
            FROM org_locations
            ORDER BY location_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err("failed to get org locations"))
    }
}
