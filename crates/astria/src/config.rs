use std::time::Duration;

/// Default Astria API base URL.
pub const DEFAULT_API_URL: &str = "https://api.astria.ai";

/// How many times an empty prompt is re-fetched before giving up.
const DEFAULT_PROMPT_POLL_ATTEMPTS: u32 = 10;

/// Delay between prompt re-fetches.
const DEFAULT_PROMPT_POLL_INTERVAL_MS: u64 = 3000;

/// Settings for the Astria client.
#[derive(Debug, Clone)]
pub struct AstriaConfig {
    /// Bearer key. Empty means every call is simulated.
    pub api_key: String,
    /// Base URL without trailing slash.
    pub api_url: String,
    pub prompt_poll_attempts: u32,
    pub prompt_poll_interval: Duration,
}

impl AstriaConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                          | Default                  |
    /// |----------------------------------|--------------------------|
    /// | `ASTRIA_API_KEY`                 | empty (simulate)         |
    /// | `ASTRIA_API_URL`                 | `https://api.astria.ai`  |
    /// | `ASTRIA_PROMPT_POLL_ATTEMPTS`    | `10`                     |
    /// | `ASTRIA_PROMPT_POLL_INTERVAL_MS` | `3000`                   |
    pub fn from_env() -> Self {
        let api_key = std::env::var("ASTRIA_API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!("ASTRIA_API_KEY is not set; Astria calls will be simulated");
        }
        Self {
            api_key,
            api_url: std::env::var("ASTRIA_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            prompt_poll_attempts: std::env::var("ASTRIA_PROMPT_POLL_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PROMPT_POLL_ATTEMPTS),
            prompt_poll_interval: Duration::from_millis(
                std::env::var("ASTRIA_PROMPT_POLL_INTERVAL_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_PROMPT_POLL_INTERVAL_MS),
            ),
        }
    }

    /// Configuration pointing at an arbitrary base URL, with polling disabled.
    pub fn with_url(api_key: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: api_url.into(),
            prompt_poll_attempts: 0,
            prompt_poll_interval: Duration::from_millis(0),
        }
    }
}
