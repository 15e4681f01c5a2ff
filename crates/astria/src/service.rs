//! The four Astria operations with their fallback policy.
//!
//! Every operation returns a [`Sourced`] value: `Real` when Astria answered,
//! `Simulated` when a placeholder was fabricated instead. Callers never see
//! an error from this layer, so the user flow is never blocked, but they can
//! always tell which results were synthetic.

use chrono::Utc;
use futures::future::join_all;
use headshots_core::prompt::{placeholder_image_urls, styled_prompt, StyleType};
use headshots_core::sourced::Sourced;
use headshots_core::training::{
    is_simulated_tune_id, simulated_status, simulated_tune_id, simulated_upload_id, LedgerStatus,
    UploadFailure,
};
use headshots_core::types::Timestamp;
use headshots_core::upload::DecodedImage;

use crate::api::{AstriaApi, AstriaApiError, CreatePromptRequest, CreateTuneRequest};
use crate::config::AstriaConfig;

/// Images produced by one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImages {
    /// Astria prompt id, when the prompt was accepted.
    pub prompt_id: Option<String>,
    pub images: Vec<String>,
}

/// Astria operations with synthetic fallbacks.
pub struct AstriaService {
    api: AstriaApi,
    config: AstriaConfig,
}

impl AstriaService {
    pub fn new(config: AstriaConfig) -> Self {
        let api = AstriaApi::new(&config);
        Self { api, config }
    }

    /// `false` when no API key is configured and every call is simulated.
    pub fn is_enabled(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    /// Upload each image; failed uploads get a `mock-*` or `error-mock-*` id.
    ///
    /// Uploads run concurrently and results keep the input order.
    pub async fn upload_images(&self, images: &[DecodedImage]) -> Vec<Sourced<String>> {
        let now = Utc::now();
        let uploads = images.iter().enumerate().map(|(index, image)| async move {
            if !self.is_enabled() {
                return Sourced::Simulated(simulated_upload_id(
                    UploadFailure::Unreachable,
                    now,
                    index,
                ));
            }
            let file_name = format!("selfie-{index}.{}", image.extension());
            match self.api.upload_image(image, &file_name).await {
                Ok(uploaded) => Sourced::Real(uploaded.id),
                Err(e) => {
                    let failure = upload_failure(&e);
                    tracing::warn!(index, error = %e, "Astria image upload failed, simulating");
                    Sourced::Simulated(simulated_upload_id(failure, now, index))
                }
            }
        });
        join_all(uploads).await
    }

    /// Create a tune from uploaded image ids; failure yields `tune-<millis>`.
    pub async fn create_tune(&self, title: &str, image_ids: Vec<String>) -> Sourced<String> {
        if !self.is_enabled() {
            return Sourced::Simulated(simulated_tune_id(Utc::now()));
        }
        let request = CreateTuneRequest::new(title, image_ids);
        match self.api.create_tune(&request).await {
            Ok(tune) => {
                tracing::info!(tune_id = %tune.id, "Astria tune created");
                Sourced::Real(tune.id)
            }
            Err(e) => {
                let tune_id = simulated_tune_id(Utc::now());
                tracing::warn!(error = %e, %tune_id, "Astria tune creation failed, simulating");
                Sourced::Simulated(tune_id)
            }
        }
    }

    /// Current status of a tune, as of now.
    pub async fn check_status(
        &self,
        tune_id: &str,
        stored: LedgerStatus,
        created_at: Timestamp,
    ) -> Sourced<LedgerStatus> {
        self.check_status_at(tune_id, stored, created_at, Utc::now())
            .await
    }

    /// Status of a tune at `now`.
    ///
    /// Synthetic ids never reach Astria: they follow the 60-second timer.
    /// A failed status call for a real id is reported as a simulated
    /// `complete` so the client stops polling.
    pub async fn check_status_at(
        &self,
        tune_id: &str,
        stored: LedgerStatus,
        created_at: Timestamp,
        now: Timestamp,
    ) -> Sourced<LedgerStatus> {
        if is_simulated_tune_id(tune_id) || !self.is_enabled() {
            return Sourced::Simulated(simulated_status(stored, created_at, now));
        }
        match self.api.get_tune(tune_id).await {
            Ok(tune) => Sourced::Real(tune.ledger_status()),
            Err(e) => {
                tracing::warn!(tune_id, error = %e, "Astria status check failed, forcing complete");
                Sourced::Simulated(LedgerStatus::Complete)
            }
        }
    }

    /// Run inference with the style suffix appended to `prompt`.
    ///
    /// Falls back to placeholder URLs, one per requested image, when the
    /// tune is synthetic, the call fails, or no images arrive within the
    /// configured number of re-fetches.
    pub async fn generate(
        &self,
        tune_id: &str,
        prompt: &str,
        style: StyleType,
        num_images: u32,
    ) -> Sourced<GeneratedImages> {
        let placeholders = |prompt_id: Option<String>| {
            Sourced::Simulated(GeneratedImages {
                prompt_id,
                images: placeholder_image_urls(num_images, style),
            })
        };

        if is_simulated_tune_id(tune_id) || !self.is_enabled() {
            return placeholders(None);
        }

        let request = CreatePromptRequest {
            text: styled_prompt(prompt, style),
            num_images,
            negative_prompt: None,
        };
        let created = match self.api.create_prompt(tune_id, &request).await {
            Ok(created) => created,
            Err(e) => {
                tracing::warn!(tune_id, error = %e, "Astria inference failed, using placeholders");
                return placeholders(None);
            }
        };

        let mut images = created.images;
        let mut attempts = 0;
        while images.is_empty() && attempts < self.config.prompt_poll_attempts {
            attempts += 1;
            tokio::time::sleep(self.config.prompt_poll_interval).await;
            match self.api.get_prompt(tune_id, &created.id).await {
                Ok(prompt) => images = prompt.images,
                Err(e) => {
                    tracing::warn!(tune_id, prompt_id = %created.id, attempt = attempts, error = %e, "Prompt re-fetch failed");
                }
            }
        }

        if images.is_empty() {
            tracing::warn!(tune_id, prompt_id = %created.id, "Prompt produced no images, using placeholders");
            return placeholders(Some(created.id));
        }

        Sourced::Real(GeneratedImages {
            prompt_id: Some(created.id),
            images,
        })
    }
}

fn upload_failure(err: &AstriaApiError) -> UploadFailure {
    if err.is_rejection() {
        UploadFailure::Rejected
    } else {
        UploadFailure::Unreachable
    }
}
