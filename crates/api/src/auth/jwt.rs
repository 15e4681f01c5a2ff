//! Local verification of Supabase access tokens.
//!
//! Supabase signs user access tokens with HS256 using the project's JWT
//! secret. When that secret is configured tokens are checked here without a
//! network round trip.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Claims read from a Supabase access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the auth user id.
    pub sub: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Postgres role, `authenticated` for signed-in users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

/// Validate signature and expiry, returning the embedded [`Claims`].
///
/// The audience is not checked: Supabase uses `authenticated` for every
/// user token.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

/// Sign an access token the way Supabase does. Used by local tooling and tests.
pub fn generate_access_token(
    user_id: Uuid,
    email: Option<&str>,
    secret: &str,
    ttl_secs: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        email: email.map(str::to_string),
        role: Some("authenticated".to_string()),
        exp: now + ttl_secs,
        iat: now,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// SHA-256 hex digest of a bearer token. Session cache keys never hold the raw token.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "super-secret-jwt-token-with-at-least-32-characters";

    #[test]
    fn generate_and_validate() {
        let user = Uuid::new_v4();
        let token = generate_access_token(user, Some("sam@example.com"), SECRET, 600).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user);
        assert_eq!(claims.email.as_deref(), Some("sam@example.com"));
        assert_eq!(claims.role.as_deref(), Some("authenticated"));
    }

    #[test]
    fn expired_token_fails() {
        let token = generate_access_token(Uuid::new_v4(), None, SECRET, -600).unwrap();
        assert!(validate_token(&token, SECRET).is_err());
    }

    #[test]
    fn wrong_secret_fails() {
        let token = generate_access_token(Uuid::new_v4(), None, SECRET, 600).unwrap();
        assert!(validate_token(&token, "another-secret").is_err());
    }

    #[test]
    fn hash_is_stable_hex() {
        let h = hash_token("abc");
        assert_eq!(h, hash_token("abc"));
        assert_eq!(h.len(), 64);
        assert_ne!(h, hash_token("abd"));
    }
}
