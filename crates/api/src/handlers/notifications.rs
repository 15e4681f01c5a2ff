//! Handler for the "your model is ready" email.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrainingNotificationRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub tune_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NotificationSent {
    pub sent: bool,
    pub to: String,
}

/// POST /api/v1/send-training-notification
pub async fn send_training_notification(
    user: AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<TrainingNotificationRequest>,
) -> AppResult<Json<DataResponse<NotificationSent>>> {
    input.validate()?;

    let email = state
        .email
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("Email delivery is not configured".into()))?;

    email
        .send_training_ready(
            &input.email,
            &state.config.site_url,
            &input.tune_id,
            input.user_name.as_deref(),
        )
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to send email: {e}")))?;

    tracing::info!(
        user_id = %user.user_id,
        tune_id = %input.tune_id,
        "Training notification sent"
    );

    Ok(Json(DataResponse {
        data: NotificationSent {
            sent: true,
            to: input.email,
        },
    }))
}
