//! Tune ledger rows (`user_tunes`) written by the astria dispatcher.

use headshots_core::training::LedgerStatus;
use headshots_core::types::{Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_tunes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserTune {
    pub user_id: UserId,
    pub tune_id: String,
    pub status: String,
    pub is_simulated: bool,
    /// Address to notify when training finishes, captured from the token.
    #[serde(skip_serializing)]
    pub notify_email: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserTune {
    /// Parsed status. Unknown strings are treated as still training.
    pub fn status(&self) -> LedgerStatus {
        LedgerStatus::parse(&self.status).unwrap_or(LedgerStatus::Training)
    }
}

/// DTO for upserting a ledger row after tune creation.
#[derive(Debug, Clone)]
pub struct UpsertUserTune {
    pub user_id: UserId,
    pub tune_id: String,
    pub status: LedgerStatus,
    pub is_simulated: bool,
    pub notify_email: Option<String>,
}
