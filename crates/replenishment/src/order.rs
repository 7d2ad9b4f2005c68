use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use aquaflow_core::{DomainError, DomainResult, LocationId, ProductId, ReplenishmentId};

use crate::level::StockLevel;

/// Replenishment order lifecycle. The only transition is
/// pending → completed; there is no cancellation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "completed" => Ok(OrderStatus::Completed),
            other => Err(DomainError::validation(format!(
                "invalid order status '{other}', expected 'pending' or 'completed'"
            ))),
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduled restocking request for one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplenishmentOrder {
    pub replenishment_id: ReplenishmentId,
    pub location_id: LocationId,
    pub scheduled_date: NaiveDate,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl ReplenishmentOrder {
    /// Guard for the complete transition.
    pub fn ensure_pending(&self) -> DomainResult<()> {
        match self.status {
            OrderStatus::Pending => Ok(()),
            OrderStatus::Completed => Err(DomainError::validation(
                "only pending replenishment orders can be completed",
            )),
        }
    }
}

/// Line item owned by a replenishment order; immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl OrderLine {
    /// Quantities must be strictly positive; zero-deficit products are
    /// excluded, not recorded.
    pub fn new(product_id: ProductId, quantity: i64) -> DomainResult<Self> {
        if quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        Ok(Self {
            product_id,
            quantity,
        })
    }
}

/// Compute the line items a location needs: one line per product whose
/// deficit is positive, quantity equal to the deficit.
pub fn plan_order_lines(levels: &[StockLevel]) -> Vec<OrderLine> {
    levels
        .iter()
        .filter_map(|level| {
            let quantity = level.deficit();
            (quantity > 0).then_some(OrderLine {
                product_id: level.product_id,
                quantity,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(product: i64, current: i64, target: i64) -> StockLevel {
        StockLevel {
            location_id: LocationId::new(1),
            product_id: ProductId::new(product),
            current_level: current,
            target_level: target,
            last_updated: Utc::now(),
        }
    }

    fn order(status: OrderStatus) -> ReplenishmentOrder {
        ReplenishmentOrder {
            replenishment_id: ReplenishmentId::new(5),
            location_id: LocationId::new(1),
            scheduled_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn status_parses_only_known_values() {
        assert_eq!(OrderStatus::parse("pending").unwrap(), OrderStatus::Pending);
        assert_eq!(
            OrderStatus::parse("completed").unwrap(),
            OrderStatus::Completed
        );
        assert!(matches!(
            OrderStatus::parse("cancelled"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn pending_orders_may_complete() {
        assert!(order(OrderStatus::Pending).ensure_pending().is_ok());
        assert!(order(OrderStatus::Completed).ensure_pending().is_err());
    }

    #[test]
    fn zero_and_negative_quantities_are_rejected() {
        assert!(OrderLine::new(ProductId::new(1), 1).is_ok());
        assert!(OrderLine::new(ProductId::new(1), 0).is_err());
        assert!(OrderLine::new(ProductId::new(1), -4).is_err());
    }

    #[test]
    fn planning_keeps_only_positive_deficits() {
        let levels = vec![
            level(1, 3, 10),  // deficit 7
            level(2, 10, 10), // exactly stocked
            level(3, 12, 10), // over-stocked
            level(4, 0, 5),   // deficit 5
        ];

        let lines = plan_order_lines(&levels);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_id, ProductId::new(1));
        assert_eq!(lines[0].quantity, 7);
        assert_eq!(lines[1].product_id, ProductId::new(4));
        assert_eq!(lines[1].quantity, 5);
    }

    #[test]
    fn planning_empty_levels_yields_no_lines() {
        assert!(plan_order_lines(&[]).is_empty());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_planned_line_is_an_exact_positive_deficit(
                pairs in proptest::collection::vec((0i64..10_000, 0i64..10_000), 0..64)
            ) {
                let levels: Vec<StockLevel> = pairs
                    .iter()
                    .enumerate()
                    .map(|(i, (current, target))| level(i as i64, *current, *target))
                    .collect();

                let lines = plan_order_lines(&levels);

                // one line exactly for each level with target > current
                let expected: Vec<(ProductId, i64)> = levels
                    .iter()
                    .filter(|l| l.target_level > l.current_level)
                    .map(|l| (l.product_id, l.target_level - l.current_level))
                    .collect();

                let got: Vec<(ProductId, i64)> =
                    lines.iter().map(|l| (l.product_id, l.quantity)).collect();

                prop_assert_eq!(got, expected);
                prop_assert!(lines.iter().all(|l| l.quantity > 0));
            }
        }
    }
}
