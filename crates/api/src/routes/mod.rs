pub mod account;
pub mod functions;
pub mod health;
pub mod models;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /astria                                          action dispatcher (POST)
/// /generate-reactions                              reaction scoring (POST)
/// /send-training-notification                      model-ready email (POST)
///
/// /models                                          list, create
/// /models/{id}                                     get
/// /models/{id}/status                              refresh status + progress
/// /models/{id}/generate                            generate images (POST)
/// /models/{id}/images                              gallery
///
/// /profile                                         get, upsert (PUT)
/// /credits                                         list
/// ```
///
/// Every route requires a bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(functions::router())
        .nest("/models", models::router())
        .merge(account::router())
}
