//! Handler for headshot reaction scoring.

use axum::extract::State;
use axum::Json;
use headshots_core::reaction::{ReactionContext, ReactionType, UserProfile};
use headshots_openai::Reaction;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, Tagged};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReactionsRequest {
    #[validate(length(min = 1))]
    pub headshot_url: String,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub user_profile: UserProfile,
    /// Empty or omitted means every type.
    #[serde(default)]
    pub reaction_types: Vec<ReactionType>,
}

#[derive(Debug, Serialize)]
pub struct ReactionsResponse {
    pub reactions: Vec<Tagged<Reaction>>,
    /// `true` if any reaction is a canned fallback.
    pub simulated: bool,
}

/// POST /api/v1/generate-reactions
pub async fn generate_reactions(
    user: AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<GenerateReactionsRequest>,
) -> AppResult<Json<DataResponse<ReactionsResponse>>> {
    input.validate()?;

    let ctx = ReactionContext {
        headshot_url: input.headshot_url,
        theme: input.theme,
        profile: input.user_profile,
    };
    let reactions: Vec<Tagged<Reaction>> = state
        .reactions
        .generate(&ctx, &input.reaction_types)
        .await
        .into_iter()
        .map(Tagged::from)
        .collect();
    let simulated = reactions.iter().any(|r| r.simulated);

    tracing::info!(
        user_id = %user.user_id,
        count = reactions.len(),
        simulated,
        "Reactions generated"
    );

    Ok(Json(DataResponse {
        data: ReactionsResponse {
            reactions,
            simulated,
        },
    }))
}
