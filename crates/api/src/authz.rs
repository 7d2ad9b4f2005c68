//! API-side capability gate.
//!
//! Enforced before the replenishment core is invoked, so the core itself
//! never inspects roles.

use axum::http::StatusCode;

use aquaflow_auth::Capability;

use crate::app::errors;
use crate::context::ActorContext;

/// Check that the acting identity holds a capability.
///
/// Returns the ready-made 403 response on failure so handlers can bail with
/// `?`-style early returns.
pub fn require_capability(
    actor: &ActorContext,
    capability: Capability,
) -> Result<(), axum::response::Response> {
    aquaflow_auth::require(actor.role(), capability)
        .map_err(|e| errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string()))
}
