//! Handlers for the dashboard's model ledger (`models`, `samples`, `images`).
//!
//! Every per-model endpoint loads the row and checks ownership before doing
//! anything else, so a caller probing someone else's model never triggers
//! an Astria call.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use headshots_core::error::CoreError;
use headshots_core::training::{estimate_progress, ModelStatus};
use headshots_core::types::{DbId, UserId};
use headshots_core::upload::{decode_data_url, validate_training_set};
use headshots_db::models::image::{CreateImage, Image};
use headshots_db::models::model::{CreateModel, Model};
use headshots_db::repositories::{ImageRepo, ModelRepo, SampleRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::handlers::generation_params;
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, Tagged};
use crate::state::AppState;
use crate::training::refresh_model;

const DEFAULT_MODEL_TYPE: &str = "person";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateModelRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[serde(rename = "type", default)]
    pub model_type: Option<String>,
    /// Base64 data URLs of the training selfies.
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(default)]
    pub style_type: Option<String>,
    #[serde(default)]
    pub num_images: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ModelProgress {
    pub id: DbId,
    pub status: ModelStatus,
    /// Heuristic percentage; 100 only once completed.
    pub progress: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImages {
    pub model_id: DbId,
    pub style_type: String,
    pub images: Vec<Image>,
    pub simulated: bool,
}

/// Load a model and require that `user_id` owns it.
async fn load_owned_model(state: &AppState, id: DbId, user_id: UserId) -> AppResult<Model> {
    let model = ModelRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Model", id))?;
    if !model.is_owned_by(user_id) {
        tracing::warn!(model_id = id, %user_id, "Rejected access to another user's model");
        return Err(CoreError::Forbidden("Unauthorized model access".into()).into());
    }
    Ok(model)
}

/// GET /api/v1/models
pub async fn list_models(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let models = ModelRepo::list_by_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: models }))
}

/// POST /api/v1/models
///
/// Upload the training set, start a tune and record the model with one
/// sample row per uploaded image.
pub async fn create_model(
    user: AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateModelRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_training_set(input.images.len())?;
    let decoded = input
        .images
        .iter()
        .map(|image| decode_data_url(image))
        .collect::<Result<Vec<_>, _>>()?;

    let model = ModelRepo::create(
        &state.pool,
        &CreateModel {
            user_id: user.user_id,
            name: input.name.trim().to_string(),
            model_type: input
                .model_type
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL_TYPE.to_string()),
            status: Some(ModelStatus::Pending),
        },
    )
    .await?;

    let uploads = state.astria.upload_images(&decoded).await;
    let mut image_ids = Vec::with_capacity(uploads.len());
    for upload in uploads {
        let image_id = upload.into_inner();
        SampleRepo::create(&state.pool, model.id, &image_id).await?;
        image_ids.push(image_id);
    }

    let tune = state.astria.create_tune(&model.name, image_ids).await;
    let simulated = tune.is_simulated();
    let tune_id = tune.into_inner();
    let model = ModelRepo::set_tune(
        &state.pool,
        model.id,
        &tune_id,
        simulated,
        ModelStatus::Training,
    )
    .await?
    .ok_or_else(|| CoreError::Internal(format!("Model {} vanished after insert", model.id)))?;

    tracing::info!(
        user_id = %user.user_id,
        model_id = model.id,
        %tune_id,
        simulated,
        "Model training started"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: model })))
}

/// GET /api/v1/models/{id}
pub async fn get_model(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let model = load_owned_model(&state, id, user.user_id).await?;
    Ok(Json(DataResponse { data: model }))
}

/// GET /api/v1/models/{id}/status
///
/// Re-checks the tune and reports a progress estimate.
pub async fn get_model_status(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let model = load_owned_model(&state, id, user.user_id).await?;
    let (model, status) =
        refresh_model(&state.pool, &state.astria, &state.event_bus, model).await?;

    let elapsed = (Utc::now() - model.created_at).num_seconds();
    let current = *status.as_ref().into_inner();
    let progress = estimate_progress(current, elapsed, model.is_simulated);

    let data: Tagged<ModelProgress> = status
        .map(|status| ModelProgress {
            id: model.id,
            status,
            progress,
        })
        .into();
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/models/{id}/generate
pub async fn generate_images(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ApiJson(input): ApiJson<GenerateRequest>,
) -> AppResult<impl IntoResponse> {
    let model = load_owned_model(&state, id, user.user_id).await?;
    let (style, num_images) =
        generation_params(&input.prompt, input.style_type.as_deref(), input.num_images)?;

    let tune_id = model
        .tune_id
        .as_deref()
        .ok_or_else(|| CoreError::Conflict("Model has no tune yet".into()))?;
    if model.status() != ModelStatus::Completed {
        return Err(CoreError::Conflict("Model is not ready yet".into()).into());
    }

    let generated = state
        .astria
        .generate(tune_id, &input.prompt, style, num_images)
        .await;
    let simulated = generated.is_simulated();

    let mut images = Vec::new();
    for uri in generated.into_inner().images {
        let image = ImageRepo::create(
            &state.pool,
            &CreateImage {
                model_id: model.id,
                uri,
                is_simulated: simulated,
            },
        )
        .await?;
        images.push(image);
    }

    tracing::info!(
        user_id = %user.user_id,
        model_id = model.id,
        style = style.as_str(),
        count = images.len(),
        simulated,
        "Model images generated"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: GeneratedImages {
                model_id: model.id,
                style_type: style.as_str().to_string(),
                images,
                simulated,
            },
        }),
    ))
}

/// GET /api/v1/models/{id}/images
pub async fn list_images(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let model = load_owned_model(&state, id, user.user_id).await?;
    let images = ImageRepo::list_by_model(&state.pool, model.id).await?;
    Ok(Json(DataResponse { data: images }))
}
