//! `aquaflow-replenishment` — pure domain logic for the stock-threshold
//! workflow: level records and deficit math, stock-out tracking, the
//! replenishment order lifecycle, and delivery-day scheduling.
//!
//! No IO lives here; persistence and notification side effects are wired in
//! by the store and API crates.

pub mod level;
pub mod order;
pub mod schedule;
pub mod stock_out;

pub use level::{StockLevel, needs_low_stock_alert, validate_levels};
pub use order::{OrderLine, OrderStatus, ReplenishmentOrder, plan_order_lines};
pub use schedule::{next_delivery_date, parse_delivery_day};
pub use stock_out::{DEFAULT_ESCALATION_THRESHOLD, StockOutCounter, StockOutEvent};
