//! JWT validation.
//!
//! Tokens are issued by the external identity provider; this service only
//! validates them. HS256 with a shared secret, standard `exp` handling.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use xpshare_core::types::DbId;

/// JWT configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HS256 secret, `AUTH_JWT_SECRET`.
    pub secret: String,
}

impl JwtConfig {
    /// Load configuration from environment variables.
    ///
    /// Falls back to a development-only secret when `AUTH_JWT_SECRET` is
    /// unset; production deployments must override it.
    pub fn from_env() -> Self {
        let secret = std::env::var("AUTH_JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("AUTH_JWT_SECRET not set, using development secret");
            "xpshare-dev-secret".to_string()
        });
        Self { secret }
    }
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The user's id at the identity provider.
    pub sub: DbId,
    /// Role name, e.g. `"member"` or `"admin"`.
    pub role: String,
    /// Expiry as a Unix timestamp.
    pub exp: i64,
}

/// Validate a bearer token and return its claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
        }
    }

    fn token_for(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_round_trips_claims() {
        let claims = Claims {
            sub: 42,
            role: "member".to_string(),
            exp: chrono::Utc::now().timestamp() + 3600,
        };
        let token = token_for(&claims, "test-secret");

        let decoded = validate_token(&token, &config()).unwrap();
        assert_eq!(decoded.sub, 42);
        assert_eq!(decoded.role, "member");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let claims = Claims {
            sub: 42,
            role: "member".to_string(),
            exp: chrono::Utc::now().timestamp() + 3600,
        };
        let token = token_for(&claims, "other-secret");
        assert!(validate_token(&token, &config()).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = Claims {
            sub: 42,
            role: "member".to_string(),
            exp: chrono::Utc::now().timestamp() - 3600,
        };
        let token = token_for(&claims, "test-secret");
        assert!(validate_token(&token, &config()).is_err());
    }
}
