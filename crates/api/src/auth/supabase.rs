//! Remote token verification against Supabase Auth (`GET /auth/v1/user`).

use std::time::Duration;

use serde::Deserialize;
use uuid::Uuid;

use super::Identity;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum SupabaseAuthError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Supabase refused the token.
    #[error("Token rejected with HTTP {0}")]
    Rejected(u16),
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

pub struct SupabaseAuth {
    client: reqwest::Client,
    url: String,
    service_role_key: String,
}

impl SupabaseAuth {
    pub fn new(url: impl Into<String>, service_role_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into().trim_end_matches('/').to_string(),
            service_role_key: service_role_key.into(),
        }
    }

    /// Resolve the user a bearer token belongs to.
    pub async fn get_user(&self, token: &str) -> Result<Identity, SupabaseAuthError> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.url))
            .header("apikey", &self.service_role_key)
            .bearer_auth(token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SupabaseAuthError::Rejected(status.as_u16()));
        }

        let user: UserResponse = response.json().await?;
        Ok(Identity {
            user_id: user.id,
            email: user.email,
        })
    }
}
