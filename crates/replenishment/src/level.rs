use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aquaflow_core::{DomainError, DomainResult, LocationId, ProductId};

/// Per-(location, product) stock record. At most one exists per pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub location_id: LocationId,
    pub product_id: ProductId,
    pub current_level: i64,
    pub target_level: i64,
    pub last_updated: DateTime<Utc>,
}

impl StockLevel {
    /// Units needed to bring the level back to target, floored at zero.
    pub fn deficit(&self) -> i64 {
        (self.target_level - self.current_level).max(0)
    }

    /// A level is low when it sits strictly below its target.
    pub fn is_low_stock(&self) -> bool {
        self.current_level < self.target_level
    }

    /// A level is stocked out when nothing is left on hand.
    pub fn is_stocked_out(&self) -> bool {
        self.current_level <= 0
    }
}

/// Reject negative level values before they reach the store.
pub fn validate_levels(current_level: i64, target_level: i64) -> DomainResult<()> {
    if current_level < 0 {
        return Err(DomainError::validation("current_level must be >= 0"));
    }
    if target_level < 0 {
        return Err(DomainError::validation("target_level must be >= 0"));
    }
    Ok(())
}

/// Alert policy: a stock update that leaves the current level strictly below
/// 20% of target warrants a "Low Stock Alert". Integer arithmetic, so the
/// comparison is exact.
pub fn needs_low_stock_alert(current_level: i64, target_level: i64) -> bool {
    current_level.saturating_mul(5) < target_level
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(current: i64, target: i64) -> StockLevel {
        StockLevel {
            location_id: LocationId::new(1),
            product_id: ProductId::new(10),
            current_level: current,
            target_level: target,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn deficit_is_floored_at_zero() {
        assert_eq!(level(3, 10).deficit(), 7);
        assert_eq!(level(10, 10).deficit(), 0);
        assert_eq!(level(15, 10).deficit(), 0);
    }

    #[test]
    fn low_stock_is_strictly_below_target() {
        assert!(level(9, 10).is_low_stock());
        assert!(!level(10, 10).is_low_stock());
        assert!(!level(11, 10).is_low_stock());
    }

    #[test]
    fn alert_fires_strictly_below_one_fifth_of_target() {
        // target 10: alert below 2, not at 2
        assert!(needs_low_stock_alert(1, 10));
        assert!(!needs_low_stock_alert(2, 10));
        // target 5: 1 is exactly 20%, no alert
        assert!(!needs_low_stock_alert(1, 5));
        assert!(needs_low_stock_alert(0, 5));
        // zero target never alerts
        assert!(!needs_low_stock_alert(0, 0));
    }

    #[test]
    fn negative_levels_are_rejected() {
        assert!(validate_levels(-1, 10).is_err());
        assert!(validate_levels(10, -1).is_err());
        assert!(validate_levels(0, 0).is_ok());
    }
}
