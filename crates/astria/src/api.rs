//! REST API client for the Astria HTTP endpoints.
//!
//! Wraps image upload, tune creation, tune status and prompt (inference)
//! calls using [`reqwest`]. No fallback logic lives here; every failure is
//! reported as an [`AstriaApiError`].

use headshots_core::training::LedgerStatus;
use headshots_core::upload::DecodedImage;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::AstriaConfig;

/// Instance token the tune is trained to associate with the user.
pub const INSTANCE_PROMPT: &str = "ohwx person";

/// Class the tune is regularised against.
pub const CLASS_PROMPT: &str = "person";

/// HTTP client for the Astria API.
pub struct AstriaApi {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

/// Errors from the Astria REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum AstriaApiError {
    /// The HTTP request itself failed (network, DNS, TLS, decode, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Astria returned a non-2xx status code.
    #[error("Astria API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl AstriaApiError {
    /// `true` when Astria answered but rejected the request.
    pub fn is_rejection(&self) -> bool {
        matches!(self, AstriaApiError::ApiError { .. })
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Response of the image-hosting endpoint.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
}

/// Body of `POST /tunes`.
#[derive(Debug, Serialize)]
pub struct CreateTuneRequest {
    pub title: String,
    /// Class name Astria uses for regularisation images.
    pub name: String,
    pub instance_prompt: String,
    pub class_prompt: String,
    pub image_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,
}

impl CreateTuneRequest {
    /// Tune request with the fixed instance and class prompts.
    pub fn new(title: impl Into<String>, image_ids: Vec<String>) -> Self {
        Self {
            title: title.into(),
            name: CLASS_PROMPT.to_string(),
            instance_prompt: INSTANCE_PROMPT.to_string(),
            class_prompt: CLASS_PROMPT.to_string(),
            image_ids,
            callback: None,
        }
    }
}

/// A tune as returned by `POST /tunes` and `GET /tunes/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TuneResponse {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub trained_at: Option<String>,
    #[serde(default)]
    pub started_training_at: Option<String>,
    #[serde(default)]
    pub failed_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl TuneResponse {
    /// Collapse Astria's timestamps and optional status into the ledger vocabulary.
    pub fn ledger_status(&self) -> LedgerStatus {
        if self.trained_at.is_some() {
            return LedgerStatus::Complete;
        }
        if self.failed_at.is_some() {
            return LedgerStatus::Error;
        }
        self.status
            .as_deref()
            .and_then(|s| LedgerStatus::parse(s).ok())
            .unwrap_or(LedgerStatus::Training)
    }
}

/// Body of `POST /tunes/{id}/prompts`.
#[derive(Debug, Serialize)]
pub struct CreatePromptRequest {
    pub text: String,
    pub num_images: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
}

/// An inference prompt and whatever images it has produced so far.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptResponse {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Astria returns numeric ids; synthetic ids are strings. Accept both.
fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

impl AstriaApi {
    pub fn new(config: &AstriaConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &AstriaConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Upload one image as multipart form data (`image` field).
    pub async fn upload_image(
        &self,
        image: &DecodedImage,
        file_name: &str,
    ) -> Result<UploadResponse, AstriaApiError> {
        let part = reqwest::multipart::Part::bytes(image.bytes.clone())
            .file_name(file_name.to_string())
            .mime_str(&image.mime_type)?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self
            .client
            .post(format!("{}/images", self.api_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Create a tune. Sends `POST /tunes` with `{ "tune": ... }`.
    pub async fn create_tune(
        &self,
        request: &CreateTuneRequest,
    ) -> Result<TuneResponse, AstriaApiError> {
        let response = self
            .client
            .post(format!("{}/tunes", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "tune": request }))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch a tune's current state.
    pub async fn get_tune(&self, tune_id: &str) -> Result<TuneResponse, AstriaApiError> {
        let response = self
            .client
            .get(format!("{}/tunes/{}", self.api_url, tune_id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Submit an inference prompt against a trained tune.
    pub async fn create_prompt(
        &self,
        tune_id: &str,
        request: &CreatePromptRequest,
    ) -> Result<PromptResponse, AstriaApiError> {
        let response = self
            .client
            .post(format!("{}/tunes/{}/prompts", self.api_url, tune_id))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "prompt": request }))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Re-fetch a prompt to pick up images produced since submission.
    pub async fn get_prompt(
        &self,
        tune_id: &str,
        prompt_id: &str,
    ) -> Result<PromptResponse, AstriaApiError> {
        let response = self
            .client
            .get(format!(
                "{}/tunes/{}/prompts/{}",
                self.api_url, tune_id, prompt_id
            ))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Return the response unchanged on 2xx, otherwise an
    /// [`AstriaApiError::ApiError`] carrying the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, AstriaApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AstriaApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AstriaApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
