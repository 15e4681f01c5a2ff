use axum::routing::{get, post};
use axum::Router;

use crate::handlers::models;
use crate::state::AppState;

/// Model routes mounted at `/models`.
///
/// ```text
/// GET    /                -> list_models
/// POST   /                -> create_model
/// GET    /{id}            -> get_model
/// GET    /{id}/status     -> get_model_status
/// POST   /{id}/generate   -> generate_images
/// GET    /{id}/images     -> list_images
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(models::list_models).post(models::create_model))
        .route("/{id}", get(models::get_model))
        .route("/{id}/status", get(models::get_model_status))
        .route("/{id}/generate", post(models::generate_images))
        .route("/{id}/images", get(models::list_images))
}
