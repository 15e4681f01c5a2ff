//! Account profile rows (`profiles`).

use headshots_core::types::{Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: UserId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing a profile from the account settings form.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
