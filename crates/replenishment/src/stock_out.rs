use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aquaflow_core::{LocationId, ProductId};

/// Counters at or above this many consecutive weeks appear in the
/// escalation report unless the caller asks for a different cutoff.
pub const DEFAULT_ESCALATION_THRESHOLD: i64 = 3;

/// Consecutive-week stock-out counter for one (location, product) pair.
///
/// The counter is written by the weekly check (or the manual diagnostic
/// endpoints); nothing in this type mutates storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockOutCounter {
    pub location_id: LocationId,
    pub product_id: ProductId,
    pub consecutive_weeks: i64,
    pub last_updated: DateTime<Utc>,
}

impl StockOutCounter {
    pub fn has_reached(&self, threshold: i64) -> bool {
        self.consecutive_weeks >= threshold
    }
}

/// One detected stock-out event. Append-only; never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockOutEvent {
    pub location_id: LocationId,
    pub product_id: ProductId,
    pub stock_out_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_check_is_inclusive() {
        let counter = StockOutCounter {
            location_id: LocationId::new(1),
            product_id: ProductId::new(2),
            consecutive_weeks: 3,
            last_updated: Utc::now(),
        };
        assert!(counter.has_reached(DEFAULT_ESCALATION_THRESHOLD));
        assert!(counter.has_reached(2));
        assert!(!counter.has_reached(4));
    }
}
