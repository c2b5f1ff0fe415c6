//! Session tokens for Mailroom.
//!
//! A session token is an HS256 JWT carrying the user id. Tokens are not
//! stored server side; validity is signature plus expiry.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{MailroomError, Result};

/// Default token lifetime in days.
pub const DEFAULT_TOKEN_EXPIRY_DAYS: u64 = 7;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID.
    pub id: i64,
    /// Issued at (unix seconds).
    pub iat: u64,
    /// Expiration (unix seconds).
    pub exp: u64,
}

/// Mints and verifies session tokens.
#[derive(Clone)]
pub struct SessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry_secs: u64,
}

impl SessionIssuer {
    /// Create an issuer from a signing secret and a lifetime in days.
    pub fn new(secret: &str, expiry_days: u64) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.required_spec_claims = ["exp".to_string()].into_iter().collect();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiry_secs: expiry_days * SECS_PER_DAY,
        }
    }

    /// Token lifetime in seconds.
    pub fn expiry_secs(&self) -> u64 {
        self.expiry_secs
    }

    /// Issue a token for a user.
    pub fn issue(&self, user_id: i64) -> Result<String> {
        let now = chrono::Utc::now().timestamp() as u64;
        self.issue_at(user_id, now)
    }

    fn issue_at(&self, user_id: i64, now: u64) -> Result<String> {
        let claims = SessionClaims {
            id: user_id,
            iat: now,
            exp: now + self.expiry_secs,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            MailroomError::Config("failed to issue token".to_string())
        })
    }

    /// Verify a token and return the user id it was issued for.
    pub fn verify(&self, token: &str) -> Result<i64> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!("JWT validation failed: {}", e);
                MailroomError::Auth("invalid or expired token".to_string())
            })?;
        Ok(data.claims.id)
    }
}

impl std::fmt::Debug for SessionIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIssuer")
            .field("expiry_secs", &self.expiry_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify() {
        let issuer = SessionIssuer::new("test-secret", DEFAULT_TOKEN_EXPIRY_DAYS);
        let token = issuer.issue(42).unwrap();
        assert_eq!(issuer.verify(&token).unwrap(), 42);
    }

    #[test]
    fn test_expiry_secs() {
        let issuer = SessionIssuer::new("test-secret", 7);
        assert_eq!(issuer.expiry_secs(), 7 * 24 * 3600);
    }

    #[test]
    fn test_expired_token() {
        let issuer = SessionIssuer::new("test-secret", 1);
        let long_ago = chrono::Utc::now().timestamp() as u64 - 2 * SECS_PER_DAY;
        let token = issuer.issue_at(1, long_ago).unwrap();
        assert!(matches!(issuer.verify(&token), Err(MailroomError::Auth(_))));
    }

    #[test]
    fn test_wrong_secret() {
        let token = SessionIssuer::new("secret1", 7).issue(1).unwrap();
        let other = SessionIssuer::new("secret2", 7);
        assert!(matches!(other.verify(&token), Err(MailroomError::Auth(_))));
    }

    #[test]
    fn test_signing_failure_is_server_error() {
        // An EC key cannot sign the default HS256 header.
        let issuer = SessionIssuer {
            encoding_key: EncodingKey::from_ec_der(&[1, 2, 3]),
            ..SessionIssuer::new("test-secret", 7)
        };

        let err = issuer.issue(1).unwrap_err();
        assert!(matches!(err, MailroomError::Config(_)));

        let api_error = crate::web::ApiError::from(err);
        assert_eq!(api_error.code(), crate::web::error::ErrorCode::InternalError);
    }

    #[test]
    fn test_garbage_token() {
        let issuer = SessionIssuer::new("test-secret", 7);
        assert!(issuer.verify("not.a.token").is_err());
        assert!(issuer.verify("").is_err());
    }
}
