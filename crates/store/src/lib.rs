//! `aquaflow-store` — Postgres persistence for the replenishment workflow.
//!
//! One repository struct per table family, each holding a shared [`PgPool`]
//! handle passed in explicitly (no global connection state). All writes are
//! single parameterized statements; create-or-update paths use `ON CONFLICT`
//! so concurrent callers cannot race an existence check.

use std::time::Duration;

pub use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use aquaflow_core::{DomainError, DomainResult};

pub mod levels;
pub mod locations;
pub mod notifications;
pub mod orders;
pub mod stock_out;

pub use levels::{LevelStore, LowStockItem, StockLevelDetail};
pub use locations::{LocationStore, OrgLocation};
pub use notifications::{NotificationStore, NotificationRow};
pub use orders::{OrderLineDetail, OrderStore, OrderWithLocation};
pub use stock_out::{CounterStore, HistoryStore, StockOutHistoryItem, ThresholdCounter};

/// Build the process-wide connection pool.
///
/// Connects lazily: construction never blocks, the first query pays for the
/// handshake. Acquisition beyond `acquire_timeout` fails the request.
pub fn build_pool(database_url: &str, acquire_timeout: Duration) -> DomainResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(acquire_timeout)
        .connect_lazy(database_url)
        .map_err(|e| DomainError::dependency(format!("failed to configure database pool: {e}")))
}

/// Explicit teardown counterpart to [`build_pool`].
pub async fn close_pool(pool: &PgPool) {
    pool.close().await;
}

/// Map a sqlx failure into the dependency-failure arm of the taxonomy,
/// logging the underlying cause.
pub(crate) fn store_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| {
        tracing::error!(error = %e, context, "database operation failed");
        DomainError::dependency(format!("{context}: {e}"))
    }
}
