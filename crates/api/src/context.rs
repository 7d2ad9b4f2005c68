use aquaflow_auth::Role;
use aquaflow_core::{OrgId, UserId};

/// Authenticated actor for a request: the identity the external token gate
/// produced. Immutable and present for all protected routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorContext {
    user_id: UserId,
    email: String,
    role: Role,
    org_id: OrgId,
}

impl ActorContext {
    pub fn new(user_id: UserId, email: String, role: Role, org_id: OrgId) -> Self {
        Self {
            user_id,
            email,
            role,
            org_id,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn org_id(&self) -> OrgId {
        self.org_id
    }
}
