//! Routes for the three serverless-style function endpoints.

use axum::routing::post;
use axum::Router;

use crate::handlers::{astria, notifications, reactions};
use crate::state::AppState;

/// ```text
/// POST /astria                      -> dispatch
/// POST /generate-reactions          -> generate_reactions
/// POST /send-training-notification  -> send_training_notification
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/astria", post(astria::dispatch))
        .route("/generate-reactions", post(reactions::generate_reactions))
        .route(
            "/send-training-notification",
            post(notifications::send_training_notification),
        )
}
