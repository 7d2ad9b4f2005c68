//! Store/dispatcher wiring and the multi-step operations behind the
//! replenishment endpoints.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use aquaflow_core::{DomainResult, LocationId, ProductId, ReplenishmentId};
use aquaflow_notify::{Dispatcher, LogMailTransport, NewNotification};
use aquaflow_replenishment::{
    OrderLine, OrderStatus, ReplenishmentOrder, StockLevel, needs_low_stock_alert,
    next_delivery_date, plan_order_lines, validate_levels,
};
use aquaflow_store::{
    CounterStore, HistoryStore, LevelStore, LocationStore, NotificationStore, OrderStore,
    OrgLocation, PgPool,
};

use crate::context::ActorContext;

pub struct AppServices {
    pub levels: LevelStore,
    pub counters: CounterStore,
    pub history: HistoryStore,
    pub orders: OrderStore,
    pub locations: LocationStore,
    pub notifications: NotificationStore,
    dispatcher: Dispatcher,
    stock_out_tracking: bool,
}

/// Wire every repository and the notification dispatcher onto one pool.
///
/// The mail transport defaults to the logging implementation; a real relay
/// is an external collaborator slotted in behind the same trait.
pub fn build_services(pool: PgPool, stock_out_tracking: bool) -> AppServices {
    let notifications = NotificationStore::new(pool.clone());
    let dispatcher = Dispatcher::new(
        Arc::new(LogMailTransport),
        Arc::new(notifications.clone()),
    );

    AppServices {
        levels: LevelStore::new(pool.clone()),
        counters: CounterStore::new(pool.clone()),
        history: HistoryStore::new(pool.clone()),
        orders: OrderStore::new(pool.clone()),
        locations: LocationStore::new(pool),
        notifications,
        dispatcher,
        stock_out_tracking,
    }
}

/// One order produced by a weekly generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedOrder {
    pub order: ReplenishmentOrder,
    pub line_count: u64,
}

/// A location the run could not generate for.
#[derive(Debug, Clone, Serialize)]
pub struct FailedLocation {
    pub location_id: i64,
    pub reason: String,
}

/// Explicit partial-failure report: earlier locations' orders stay
/// committed even when a later location fails.
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyGenerationReport {
    pub run_id: Uuid,
    pub created: Vec<GeneratedOrder>,
    pub failed: Vec<FailedLocation>,
}

impl AppServices {
    /// Upsert both levels for a (location, product) key and raise the
    /// low-stock alert when the new current level sits below 20% of target.
    pub async fn set_stock_levels(
        &self,
        actor: &ActorContext,
        location_id: LocationId,
        product_id: ProductId,
        current_level: i64,
        target_level: i64,
    ) -> DomainResult<StockLevel> {
        validate_levels(current_level, target_level)?;

        let level = self
            .levels
            .set_level(location_id, product_id, target_level, current_level)
            .await?;

        if needs_low_stock_alert(current_level, target_level) {
            self.send_low_stock_alert(actor, location_id, product_id).await?;
        }

        Ok(level)
    }

    /// Update only the current level of an existing record, with the same
    /// alert policy as [`Self::set_stock_levels`].
    pub async fn update_current_level(
        &self,
        actor: &ActorContext,
        location_id: LocationId,
        product_id: ProductId,
        current_level: i64,
    ) -> DomainResult<StockLevel> {
        if current_level < 0 {
            return Err(aquaflow_core::DomainError::validation(
                "current_level must be >= 0",
            ));
        }

        let level = self
            .levels
            .update_current_level(location_id, product_id, current_level)
            .await?;

        if needs_low_stock_alert(level.current_level, level.target_level) {
            self.send_low_stock_alert(actor, location_id, product_id).await?;
        }

        Ok(level)
    }

    async fn send_low_stock_alert(
        &self,
        actor: &ActorContext,
        location_id: LocationId,
        product_id: ProductId,
    ) -> DomainResult<()> {
        self.dispatcher
            .dispatch(NewNotification {
                org_id: actor.org_id(),
                location_id: Some(location_id),
                product_id: Some(product_id),
                subject: "Low Stock Alert".to_string(),
                message: format!(
                    "Stock level for product {product_id} is below 20% of target level"
                ),
                sent_to: actor.email().to_string(),
            })
            .await?;
        Ok(())
    }

    /// Create an order header plus its line items in one operation.
    pub async fn create_order(
        &self,
        location_id: LocationId,
        scheduled_date: NaiveDate,
        products: Vec<(ProductId, i64)>,
    ) -> DomainResult<(ReplenishmentOrder, u64)> {
        let lines = products
            .into_iter()
            .map(|(product_id, quantity)| OrderLine::new(product_id, quantity))
            .collect::<DomainResult<Vec<_>>>()?;

        let order = self.orders.create_order(location_id, scheduled_date).await?;
        let line_count = self
            .orders
            .add_order_lines(order.replenishment_id, &lines)
            .await?;

        Ok((order, line_count))
    }

    /// pending → completed, then exactly one "Replenishment Completed"
    /// notification to the acting user's organization.
    pub async fn complete_order(
        &self,
        actor: &ActorContext,
        replenishment_id: ReplenishmentId,
    ) -> DomainResult<ReplenishmentOrder> {
        let order = self
            .orders
            .get_order(replenishment_id)
            .await?
            .ok_or(aquaflow_core::DomainError::NotFound)?;
        order.ensure_pending()?;

        let completed = self
            .orders
            .update_status(replenishment_id, OrderStatus::Completed)
            .await?;

        self.dispatcher
            .dispatch(NewNotification {
                org_id: actor.org_id(),
                location_id: Some(completed.location_id),
                product_id: None,
                subject: "Replenishment Completed".to_string(),
                message: format!(
                    "Replenishment order #{replenishment_id} has been completed"
                ),
                sent_to: actor.email().to_string(),
            })
            .await?;

        Ok(completed)
    }

    /// One replenishment order per location: schedule from the location's
    /// delivery day, line items from its positive deficits. Locations are
    /// processed sequentially and independently; failures are collected
    /// into the report rather than aborting the run.
    pub async fn generate_weekly_orders(&self, today: NaiveDate) -> DomainResult<WeeklyGenerationReport> {
        let locations = self.locations.all().await?;

        let mut report = WeeklyGenerationReport {
            run_id: Uuid::now_v7(),
            created: Vec::new(),
            failed: Vec::new(),
        };

        for location in &locations {
            match self.generate_for_location(location, today).await {
                Ok(generated) => report.created.push(generated),
                Err(e) => {
                    tracing::warn!(
                        location_id = location.location_id,
                        error = %e,
                        "weekly generation failed for location"
                    );
                    report.failed.push(FailedLocation {
                        location_id: location.location_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            run_id = %report.run_id,
            created = report.created.len(),
            failed = report.failed.len(),
            "weekly replenishment generation finished"
        );

        Ok(report)
    }

    async fn generate_for_location(
        &self,
        location: &OrgLocation,
        today: NaiveDate,
    ) -> DomainResult<GeneratedOrder> {
        let location_id = LocationId::new(location.location_id);
        let scheduled_date = next_delivery_date(&location.delivery_day, today)?;

        let order = self.orders.create_order(location_id, scheduled_date).await?;
        let levels = self.levels.levels_for_planning(location_id).await?;

        if self.stock_out_tracking {
            self.track_stock_outs(&levels).await?;
        }

        let lines = plan_order_lines(&levels);
        let line_count = if lines.is_empty() {
            0
        } else {
            self.orders
                .add_order_lines(order.replenishment_id, &lines)
                .await?
        };

        Ok(GeneratedOrder { order, line_count })
    }

    /// Optional hook: drive the stock-out counters off the weekly check.
    /// Stocked-out products get an increment plus a history row; in-stock
    /// products reset an existing non-zero counter.
    async fn track_stock_outs(&self, levels: &[StockLevel]) -> DomainResult<()> {
        for level in levels {
            if level.is_stocked_out() {
                self.counters
                    .increment(level.location_id, level.product_id)
                    .await?;
                self.history
                    .record_stock_out(level.location_id, level.product_id)
                    .await?;
            } else if let Some(counter) = self
                .counters
                .get_counter(level.location_id, level.product_id)
                .await?
            {
                if counter.consecutive_weeks > 0 {
                    self.counters.reset(level.location_id, level.product_id).await?;
                }
            }
        }
        Ok(())
    }

    /// Send an arbitrary notification (admin surface), recording it after
    /// the transport accepts it.
    pub async fn send_notification(&self, notification: NewNotification) -> DomainResult<aquaflow_core::NotificationId> {
        self.dispatcher.dispatch(notification).await
    }
}
