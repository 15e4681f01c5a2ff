use axum::routing::get;
use axum::Router;

use crate::handlers::account;
use crate::state::AppState;

/// ```text
/// GET  /profile  -> get_profile
/// PUT  /profile  -> update_profile
/// GET  /credits  -> list_credits
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(account::get_profile).put(account::update_profile),
        )
        .route("/credits", get(account::list_credits))
}
