//! Trained model rows (`models`), the dashboard's view of a tune.

use headshots_core::training::ModelStatus;
use headshots_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `models` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Model {
    pub id: DbId,
    pub user_id: UserId,
    /// External (Astria) tune id. `None` until tune creation returns.
    #[sqlx(rename = "modelid")]
    pub tune_id: Option<String>,
    pub name: String,
    pub status: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub model_type: String,
    pub is_simulated: bool,
    pub created_at: Timestamp,
}

impl Model {
    /// Parsed status. Unknown strings are treated as `pending`.
    pub fn status(&self) -> ModelStatus {
        ModelStatus::parse(&self.status).unwrap_or(ModelStatus::Pending)
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// DTO for inserting a model when training starts.
#[derive(Debug, Clone)]
pub struct CreateModel {
    pub user_id: UserId,
    pub name: String,
    pub model_type: String,
    /// Defaults to `pending` if omitted.
    pub status: Option<ModelStatus>,
}
