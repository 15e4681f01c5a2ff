//! Generated headshot rows (`images`).

use headshots_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Image {
    pub id: DbId,
    #[sqlx(rename = "modelid")]
    pub model_id: DbId,
    pub uri: String,
    pub is_simulated: bool,
    pub created_at: Timestamp,
}

/// DTO for inserting a generated image.
#[derive(Debug, Clone)]
pub struct CreateImage {
    pub model_id: DbId,
    pub uri: String,
    pub is_simulated: bool,
}
