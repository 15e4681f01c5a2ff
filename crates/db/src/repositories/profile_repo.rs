//! Repository for the `profiles` table.

use headshots_core::types::UserId;
use sqlx::PgPool;

use crate::models::profile::{Profile, UpsertProfile};

const COLUMNS: &str = "id, first_name, last_name, updated_at";

/// Read and upsert account profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn find_by_id(pool: &PgPool, id: UserId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert the profile or overwrite its names, bumping `updated_at`.
    pub async fn upsert(
        pool: &PgPool,
        id: UserId,
        input: &UpsertProfile,
    ) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (id, first_name, last_name, updated_at)
             VALUES ($1, $2, $3, now())
             ON CONFLICT (id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                updated_at = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .fetch_one(pool)
            .await
    }
}
