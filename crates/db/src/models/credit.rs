use headshots_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `credits` table. Balances are managed outside this service.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Credit {
    pub id: DbId,
    pub user_id: UserId,
    pub credits: i32,
    pub created_at: Timestamp,
}
