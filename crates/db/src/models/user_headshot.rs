use headshots_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_headshots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserHeadshot {
    pub id: DbId,
    pub user_id: UserId,
    pub image_url: String,
    pub prompt_id: Option<String>,
    pub style_type: String,
    pub is_simulated: bool,
    pub created_at: Timestamp,
}

/// DTO for inserting one generated headshot.
#[derive(Debug, Clone)]
pub struct CreateUserHeadshot {
    pub user_id: UserId,
    pub image_url: String,
    pub prompt_id: Option<String>,
    pub style_type: String,
    pub is_simulated: bool,
}
