//! Repository for the `credits` table (read-only).

use headshots_core::types::UserId;
use sqlx::PgPool;

use crate::models::credit::Credit;

const COLUMNS: &str = "id, user_id, credits, created_at";

pub struct CreditRepo;

impl CreditRepo {
    /// All credit rows for a user, newest first.
    pub async fn list_by_user(pool: &PgPool, user_id: UserId) -> Result<Vec<Credit>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM credits WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Credit>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
