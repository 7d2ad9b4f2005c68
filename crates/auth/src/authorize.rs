//! Capability checks consumed as handler preconditions.
//!
//! Role checks are collapsed into this one declarative layer so the
//! replenishment core never inspects roles itself.

use thiserror::Error;

use crate::Role;

/// A named capability an operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Create/complete replenishment orders, mutate stock levels and
    /// counters, run the weekly generator.
    ManageReplenishment,
    /// Send notifications on behalf of the system.
    ManageNotifications,
    /// Read stock, stock-out and order reports.
    ViewReports,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ManageReplenishment => "replenishment.manage",
            Capability::ManageNotifications => "notifications.manage",
            Capability::ViewReports => "reports.view",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing capability '{0}'")]
    Forbidden(&'static str),
}

fn grants(role: Role, capability: Capability) -> bool {
    match role {
        Role::Admin => true,
        Role::Staff => matches!(capability, Capability::ViewReports),
        Role::Customer => false,
    }
}

/// Authorize a role for a capability.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn require(role: Role, capability: Capability) -> Result<(), AuthzError> {
    if grants(role, capability) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(capability.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_holds_every_capability() {
        for cap in [
            Capability::ManageReplenishment,
            Capability::ManageNotifications,
            Capability::ViewReports,
        ] {
            assert!(require(Role::Admin, cap).is_ok());
        }
    }

    #[test]
    fn staff_can_only_view_reports() {
        assert!(require(Role::Staff, Capability::ViewReports).is_ok());
        assert!(require(Role::Staff, Capability::ManageReplenishment).is_err());
        assert!(require(Role::Staff, Capability::ManageNotifications).is_err());
    }

    #[test]
    fn customer_holds_nothing() {
        assert!(require(Role::Customer, Capability::ViewReports).is_err());
        assert!(matches!(
            require(Role::Customer, Capability::ManageReplenishment),
            Err(AuthzError::Forbidden("replenishment.manage"))
        ));
    }
}
