use headshots_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `samples` table: one uploaded training image.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Sample {
    pub id: DbId,
    #[sqlx(rename = "modelid")]
    pub model_id: DbId,
    /// Id returned by the image-hosting endpoint, or a synthetic `mock-*` id.
    pub image_id: String,
    pub created_at: Timestamp,
}
