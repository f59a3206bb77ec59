//! JWT issuance and validation
//!
//! Tokens are stateless HS256 bearer credentials: a signed `{sub, iat, exp}`
//! claim set with a 24-hour default lifetime. There is no server-side
//! revocation; a compromised token is only invalidated by expiry or by
//! rotating the signing secret (which invalidates every outstanding token).

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Claims embedded in an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id
    pub sub: Uuid,
    /// Issued-at, unix seconds
    pub iat: i64,
    /// Expiry, unix seconds
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    Encode(jsonwebtoken::errors::Error),
    #[error("Invalid token: {0}")]
    Invalid(jsonwebtoken::errors::Error),
}

/// Issues and validates access tokens with a shared secret
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

impl JwtManager {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        }
    }

    /// Create an access token for a user with the default TTL.
    pub fn create_access_token(&self, user_id: Uuid) -> Result<String, JwtError> {
        self.create_access_token_with_ttl(user_id, Duration::hours(self.expiry_hours))
    }

    /// Create an access token with an explicit TTL.
    pub fn create_access_token_with_ttl(
        &self,
        user_id: Uuid,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp(),
            exp: (now + ttl).unix_timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )
        .map_err(JwtError::Encode)
    }

    /// Validate a token's signature and expiry and return its claims.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(JwtError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> JwtManager {
        JwtManager::new("test-signing-secret", 24)
    }

    #[test]
    fn round_trip_returns_subject() {
        let manager = manager();
        let user_id = Uuid::new_v4();

        let token = manager.create_access_token(user_id).unwrap();
        let claims = manager.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn default_ttl_is_24_hours() {
        let manager = manager();
        let token = manager.create_access_token(Uuid::new_v4()).unwrap();
        let claims = manager.validate_access_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn expired_token_fails_validation() {
        let manager = manager();
        // Expiry forced an hour into the past
        let token = manager
            .create_access_token_with_ttl(Uuid::new_v4(), Duration::hours(-1))
            .unwrap();

        assert!(manager.validate_access_token(&token).is_err());
    }

    #[test]
    fn wrong_secret_fails_validation() {
        let issuer = JwtManager::new("secret-a", 24);
        let verifier = JwtManager::new("secret-b", 24);

        let token = issuer.create_access_token(Uuid::new_v4()).unwrap();
        assert!(verifier.validate_access_token(&token).is_err());
    }

    #[test]
    fn malformed_token_fails_validation() {
        let manager = manager();
        assert!(manager.validate_access_token("not.a.token").is_err());
        assert!(manager.validate_access_token("").is_err());
    }
}
