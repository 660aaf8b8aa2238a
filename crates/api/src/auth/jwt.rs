//! Bearer token validation.
//!
//! Tokens are HS256 JWTs issued by the back-office login flow with a shared
//! secret. This service only reads them.

use emargement_core::types::DbId;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims this service reads from an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Internal user id.
    pub sub: DbId,
    /// `"admin"`, `"trainer"` or `"client"`.
    pub role: String,
    /// Expiry as a UTC Unix timestamp.
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
}

impl JwtConfig {
    /// Reads `JWT_SECRET`.
    ///
    /// # Panics
    ///
    /// Panics at startup when the variable is missing or empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.is_empty(), "JWT_SECRET must be set and non-empty");
        Self { secret }
    }
}

/// Checks signature and expiry, returning the claims.
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
