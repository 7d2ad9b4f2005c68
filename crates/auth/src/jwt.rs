//! HS256 token verification behind a trait seam.
//!
//! The API layer depends on [`TokenValidator`] only, so tests (and any
//! future key-rotation scheme) can swap the implementation.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

use crate::claims::{AuthClaims, TokenValidationError, validate_claims};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed or unverifiable token")]
    Malformed,

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Verifies a bearer token and returns its claims.
pub trait TokenValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<AuthClaims, TokenError>;
}

/// HS256 validator over a shared secret.
pub struct Hs256TokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256TokenValidator {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Time-window checks are done deterministically by `validate_claims`
        // against the injected `now`, not by the decoder's clock.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl TokenValidator for Hs256TokenValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<AuthClaims, TokenError> {
        let data = jsonwebtoken::decode::<AuthClaims>(token, &self.key, &self.validation)
            .map_err(|_| TokenError::Malformed)?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aquaflow_core::{OrgId, UserId};
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header};

    use crate::Role;

    fn mint(secret: &str, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> String {
        let claims = AuthClaims {
            sub: UserId::new(42),
            email: "dispatch@example.com".to_string(),
            role: Role::Staff,
            org_id: OrgId::new(3),
            issued_at,
            expires_at,
        };
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("failed to encode token")
    }

    #[test]
    fn round_trips_valid_token() {
        let now = Utc::now();
        let token = mint("s3cret", now - Duration::minutes(1), now + Duration::minutes(10));

        let validator = Hs256TokenValidator::new(b"s3cret");
        let claims = validator.validate(&token, now).unwrap();
        assert_eq!(claims.sub, UserId::new(42));
        assert_eq!(claims.role, Role::Staff);
        assert_eq!(claims.org_id, OrgId::new(3));
    }

    #[test]
    fn rejects_wrong_secret() {
        let now = Utc::now();
        let token = mint("s3cret", now, now + Duration::minutes(10));

        let validator = Hs256TokenValidator::new(b"other");
        assert_eq!(validator.validate(&token, now), Err(TokenError::Malformed));
    }

    #[test]
    fn rejects_expired_token() {
        let now = Utc::now();
        let token = mint("s3cret", now - Duration::hours(2), now - Duration::hours(1));

        let validator = Hs256TokenValidator::new(b"s3cret");
        assert_eq!(
            validator.validate(&token, now),
            Err(TokenError::Claims(TokenValidationError::Expired))
        );
    }
}
