//! JWT access token creation and validation.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use arkiv_core::config::auth::AuthConfig;
use arkiv_core::error::AppError;

/// JWT claims payload embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the user ID.
    pub sub: Uuid,
    /// Email for convenience.
    pub email: String,
    /// Display name for convenience.
    pub fullname: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// JWT ID.
    pub jti: Uuid,
}

impl Claims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// A freshly issued access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    /// The signed token.
    pub access_token: String,
    /// When it expires.
    pub expires_at: DateTime<Utc>,
}

/// Signs and validates access tokens with an HMAC secret.
#[derive(Clone)]
pub struct JwtCodec {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// HMAC secret key for validation.
    decoding_key: DecodingKey,
    /// Access token TTL in minutes.
    access_ttl_minutes: i64,
}

impl std::fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtCodec")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .finish()
    }
}

impl JwtCodec {
    /// Creates a new codec from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl_minutes: config.jwt_access_ttl_minutes as i64,
        }
    }

    /// Issues a signed access token for the given user.
    pub fn issue(&self, user_id: Uuid, email: &str, fullname: &str) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::minutes(self.access_ttl_minutes);

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            fullname: fullname.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
        };

        let access_token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        Ok(IssuedToken {
            access_token,
            expires_at,
        })
    }

    /// Validates a token's signature and expiry and returns its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::authentication("Access token has expired")
                }
                _ => AppError::authentication("Invalid access token"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> JwtCodec {
        JwtCodec::new(&AuthConfig {
            jwt_secret: "test-secret".into(),
            jwt_access_ttl_minutes: 60,
            password_min_length: 8,
        })
    }

    #[test]
    fn test_issue_then_verify_roundtrip() {
        let codec = codec();
        let user_id = Uuid::new_v4();

        let token = codec.issue(user_id, "ada@example.com", "Ada").expect("issue");
        let claims = codec.verify(&token.access_token).expect("verify");

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.email, "ada@example.com");
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let err = codec().verify("not-a-token").expect_err("reject");
        assert_eq!(err.kind, arkiv_core::error::ErrorKind::Authentication);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = codec()
            .issue(Uuid::new_v4(), "a@b.c", "A")
            .expect("issue");

        let other = JwtCodec::new(&AuthConfig {
            jwt_secret: "different-secret".into(),
            jwt_access_ttl_minutes: 60,
            password_min_length: 8,
        });
        assert!(other.verify(&token.access_token).is_err());
    }
}
