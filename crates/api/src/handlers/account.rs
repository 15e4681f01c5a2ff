//! Handlers for the caller's profile and credit balance.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use headshots_db::models::profile::UpsertProfile;
use headshots_db::repositories::{CreditRepo, ProfileRepo};

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/profile
///
/// Returns 204 if the account settings were never saved.
pub async fn get_profile(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    match ProfileRepo::find_by_id(&state.pool, user.user_id).await? {
        Some(profile) => Ok(Json(DataResponse { data: profile }).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// PUT /api/v1/profile
pub async fn update_profile(
    user: AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<UpsertProfile>,
) -> AppResult<impl IntoResponse> {
    let input = UpsertProfile {
        first_name: trimmed(input.first_name),
        last_name: trimmed(input.last_name),
    };
    let profile = ProfileRepo::upsert(&state.pool, user.user_id, &input).await?;

    tracing::info!(user_id = %user.user_id, "Profile updated");

    Ok(Json(DataResponse { data: profile }))
}

/// GET /api/v1/credits
pub async fn list_credits(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let credits = CreditRepo::list_by_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: credits }))
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
