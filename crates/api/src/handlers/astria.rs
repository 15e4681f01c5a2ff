//! The Astria action dispatcher.
//!
//! One endpoint, four actions selected by the `action` field. Astria
//! failures never surface as errors: each action answers with real or
//! simulated data and says which through `simulated`. Only a bad request
//! body or a failed validation is rejected.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use headshots_core::error::CoreError;
use headshots_core::sourced::Sourced;
use headshots_core::training::{is_simulated_tune_id, LedgerStatus};
use headshots_core::upload::{decode_data_url, validate_training_set, validate_upload_batch};
use headshots_db::models::user_headshot::CreateUserHeadshot;
use headshots_db::models::user_tune::{UpsertUserTune, UserTune};
use headshots_db::repositories::{UserHeadshotRepo, UserTuneRepo};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::handlers::generation_params;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::training::refresh_user_tune;

const DEFAULT_TUNE_TITLE: &str = "AI Headshots";

/// Request body, tagged by `action`.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum AstriaAction {
    UploadImages {
        /// Base64 data URLs.
        images: Vec<String>,
    },
    CreateTune {
        #[serde(rename = "imageIds")]
        image_ids: Vec<String>,
        #[serde(default)]
        title: Option<String>,
    },
    CheckStatus {
        /// Defaults to the caller's most recent tune.
        #[serde(rename = "tuneId", default)]
        tune_id: Option<String>,
    },
    GenerateHeadshots {
        #[serde(rename = "tuneId")]
        tune_id: String,
        prompt: String,
        #[serde(rename = "styleType", default)]
        style_type: Option<String>,
        #[serde(rename = "numImages", default)]
        num_images: Option<u32>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImages {
    pub image_ids: Vec<String>,
    /// Indexes of the ids that were fabricated locally.
    pub simulated_indexes: Vec<usize>,
    pub simulated: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TuneState {
    pub tune_id: String,
    pub status: LedgerStatus,
    pub simulated: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedHeadshots {
    pub tune_id: String,
    pub prompt_id: Option<String>,
    pub style_type: String,
    pub images: Vec<String>,
    pub simulated: bool,
}

/// Responses of the four actions, serialized without a wrapper tag.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AstriaResponse {
    Uploaded(UploadedImages),
    Tune(TuneState),
    Generated(GeneratedHeadshots),
}

/// POST /api/v1/astria
pub async fn dispatch(
    user: AuthUser,
    State(state): State<AppState>,
    ApiJson(action): ApiJson<AstriaAction>,
) -> AppResult<Json<DataResponse<AstriaResponse>>> {
    let data = match action {
        AstriaAction::UploadImages { images } => {
            AstriaResponse::Uploaded(upload_images(&state, &user, &images).await?)
        }
        AstriaAction::CreateTune { image_ids, title } => {
            AstriaResponse::Tune(create_tune(&state, &user, image_ids, title).await?)
        }
        AstriaAction::CheckStatus { tune_id } => {
            AstriaResponse::Tune(check_status(&state, &user, tune_id).await?)
        }
        AstriaAction::GenerateHeadshots {
            tune_id,
            prompt,
            style_type,
            num_images,
        } => AstriaResponse::Generated(
            generate_headshots(&state, &user, tune_id, &prompt, style_type.as_deref(), num_images)
                .await?,
        ),
    };
    Ok(Json(DataResponse { data }))
}

async fn upload_images(
    state: &AppState,
    user: &AuthUser,
    images: &[String],
) -> AppResult<UploadedImages> {
    validate_upload_batch(images.len())?;
    let decoded = images
        .iter()
        .map(|image| decode_data_url(image))
        .collect::<Result<Vec<_>, _>>()?;

    let results = state.astria.upload_images(&decoded).await;
    let simulated_indexes: Vec<usize> = results
        .iter()
        .enumerate()
        .filter(|(_, id)| id.is_simulated())
        .map(|(index, _)| index)
        .collect();

    tracing::info!(
        user_id = %user.user_id,
        count = results.len(),
        simulated = simulated_indexes.len(),
        "Images uploaded"
    );

    Ok(UploadedImages {
        simulated: !simulated_indexes.is_empty(),
        simulated_indexes,
        image_ids: results.into_iter().map(Sourced::into_inner).collect(),
    })
}

async fn create_tune(
    state: &AppState,
    user: &AuthUser,
    image_ids: Vec<String>,
    title: Option<String>,
) -> AppResult<TuneState> {
    validate_training_set(image_ids.len())?;
    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TUNE_TITLE.to_string());

    let tune = state.astria.create_tune(&title, image_ids).await;
    let simulated = tune.is_simulated();
    let tune_id = tune.into_inner();

    UserTuneRepo::upsert(
        &state.pool,
        &UpsertUserTune {
            user_id: user.user_id,
            tune_id: tune_id.clone(),
            status: LedgerStatus::Training,
            is_simulated: simulated,
            notify_email: user.email.clone(),
        },
    )
    .await?;

    tracing::info!(user_id = %user.user_id, %tune_id, simulated, "Tune training started");

    Ok(TuneState {
        tune_id,
        status: LedgerStatus::Training,
        simulated,
    })
}

async fn check_status(
    state: &AppState,
    user: &AuthUser,
    tune_id: Option<String>,
) -> AppResult<TuneState> {
    let tune = match tune_id.filter(|id| !id.trim().is_empty()) {
        Some(id) => match UserTuneRepo::find(&state.pool, user.user_id, &id).await? {
            Some(tune) => tune,
            // Real tunes are only known through create-tune.
            None if !is_simulated_tune_id(&id) => {
                return Err(CoreError::not_found("Tune", id).into());
            }
            // Unknown synthetic ids start a ledger row so the timer has an origin.
            None => {
                UserTuneRepo::upsert(
                    &state.pool,
                    &UpsertUserTune {
                        user_id: user.user_id,
                        is_simulated: true,
                        tune_id: id,
                        status: LedgerStatus::Training,
                        notify_email: user.email.clone(),
                    },
                )
                .await?
            }
        },
        None => UserTuneRepo::latest_for_user(&state.pool, user.user_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Tune", "latest"))?,
    };

    let status = refresh_user_tune(&state.pool, &state.astria, &state.event_bus, &tune).await?;
    Ok(tune_state(tune, status))
}

fn tune_state(tune: UserTune, status: Sourced<LedgerStatus>) -> TuneState {
    TuneState {
        tune_id: tune.tune_id,
        simulated: status.is_simulated(),
        status: status.into_inner(),
    }
}

async fn generate_headshots(
    state: &AppState,
    user: &AuthUser,
    tune_id: String,
    prompt: &str,
    style_type: Option<&str>,
    num_images: Option<u32>,
) -> AppResult<GeneratedHeadshots> {
    if tune_id.trim().is_empty() {
        return Err(CoreError::Validation("tuneId is required".into()).into());
    }
    let (style, num_images) = generation_params(prompt, style_type, num_images)?;

    let generated = state
        .astria
        .generate(&tune_id, prompt, style, num_images)
        .await;
    let simulated = generated.is_simulated();
    let generated = generated.into_inner();

    for url in &generated.images {
        UserHeadshotRepo::create(
            &state.pool,
            &CreateUserHeadshot {
                user_id: user.user_id,
                image_url: url.clone(),
                prompt_id: generated.prompt_id.clone(),
                style_type: style.as_str().to_string(),
                is_simulated: simulated,
            },
        )
        .await?;
    }

    tracing::info!(
        user_id = %user.user_id,
        %tune_id,
        style = style.as_str(),
        count = generated.images.len(),
        simulated,
        "Headshots generated"
    );

    Ok(GeneratedHeadshots {
        tune_id,
        prompt_id: generated.prompt_id,
        style_type: style.as_str().to_string(),
        images: generated.images,
        simulated,
    })
}
