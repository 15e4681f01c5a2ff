//! Bearer-token authentication.
//!
//! - [`jwt`] -- local HS256 verification with the Supabase JWT secret.
//! - [`supabase`] -- remote verification through Supabase Auth.
//! - [`session`] -- TTL cache of remotely verified tokens.
//!
//! [`Authenticator`] picks the local path when a JWT secret is configured
//! and falls back to the remote one otherwise.

pub mod jwt;
pub mod session;
pub mod supabase;

use std::time::Duration;

use headshots_core::error::CoreError;
use uuid::Uuid;

use self::session::SessionStore;
use self::supabase::{SupabaseAuth, SupabaseAuthError};

const DEFAULT_SESSION_TTL_SECS: u64 = 300;

/// The signed-in user a token resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub supabase_url: Option<String>,
    pub service_role_key: Option<String>,
    pub session_ttl_secs: u64,
}

impl AuthConfig {
    /// Load auth configuration from environment variables.
    ///
    /// | Env Var                     | Required                      | Default |
    /// |-----------------------------|-------------------------------|---------|
    /// | `SUPABASE_JWT_SECRET`       | one of secret or URL          | --      |
    /// | `SUPABASE_URL`              | one of secret or URL          | --      |
    /// | `SUPABASE_SERVICE_ROLE_KEY` | with `SUPABASE_URL`           | --      |
    /// | `SESSION_TTL_SECS`          | no                            | `300`   |
    ///
    /// # Panics
    ///
    /// Panics if neither a JWT secret nor a Supabase URL with a service role
    /// key is configured.
    pub fn from_env() -> Self {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());

        let config = Self {
            jwt_secret: env("SUPABASE_JWT_SECRET"),
            supabase_url: env("SUPABASE_URL"),
            service_role_key: env("SUPABASE_SERVICE_ROLE_KEY"),
            session_ttl_secs: env("SESSION_TTL_SECS")
                .map(|v| v.parse().expect("SESSION_TTL_SECS must be a valid u64"))
                .unwrap_or(DEFAULT_SESSION_TTL_SECS),
        };

        assert!(
            config.jwt_secret.is_some()
                || (config.supabase_url.is_some() && config.service_role_key.is_some()),
            "Set SUPABASE_JWT_SECRET, or SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY"
        );
        config
    }

    /// Local verification only.
    pub fn with_jwt_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: Some(secret.into()),
            supabase_url: None,
            service_role_key: None,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }

    /// Remote verification only.
    pub fn with_supabase(url: impl Into<String>, service_role_key: impl Into<String>) -> Self {
        Self {
            jwt_secret: None,
            supabase_url: Some(url.into()),
            service_role_key: Some(service_role_key.into()),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

pub struct Authenticator {
    jwt_secret: Option<String>,
    supabase: Option<SupabaseAuth>,
    sessions: SessionStore,
}

impl Authenticator {
    pub fn new(config: &AuthConfig) -> Self {
        let supabase = match (&config.supabase_url, &config.service_role_key) {
            (Some(url), Some(key)) => Some(SupabaseAuth::new(url.clone(), key.clone())),
            _ => None,
        };
        Self {
            jwt_secret: config.jwt_secret.clone(),
            supabase,
            sessions: SessionStore::new(Duration::from_secs(config.session_ttl_secs)),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Resolve a bearer token to an [`Identity`].
    pub async fn authenticate(&self, token: &str) -> Result<Identity, CoreError> {
        if let Some(secret) = &self.jwt_secret {
            let claims = jwt::validate_token(token, secret)
                .map_err(|_| CoreError::Unauthorized("Invalid or expired token".into()))?;
            return Ok(Identity {
                user_id: claims.sub,
                email: claims.email,
            });
        }

        let supabase = self
            .supabase
            .as_ref()
            .ok_or_else(|| CoreError::Internal("No token verifier configured".into()))?;

        let key = jwt::hash_token(token);
        if let Some(identity) = self.sessions.get(&key).await {
            return Ok(identity);
        }

        match supabase.get_user(token).await {
            Ok(identity) => {
                self.sessions.insert(key, identity.clone()).await;
                Ok(identity)
            }
            Err(SupabaseAuthError::Rejected(status)) => {
                self.sessions.evict(&key).await;
                tracing::debug!(status, "Supabase rejected bearer token");
                Err(CoreError::Unauthorized("Invalid or expired token".into()))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Supabase token verification failed");
                Err(CoreError::Unauthorized("Unable to verify token".into()))
            }
        }
    }
}
