//! `aquaflow-auth` — authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: token
//! issuance and password hashing live elsewhere; this crate verifies
//! already-issued tokens and answers capability questions.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod roles;

pub use authorize::{AuthzError, Capability, require};
pub use claims::{AuthClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256TokenValidator, TokenError, TokenValidator};
pub use roles::Role;
