//! Repository for the `user_headshots` table.

use headshots_core::types::UserId;
use sqlx::PgPool;

use crate::models::user_headshot::{CreateUserHeadshot, UserHeadshot};

const COLUMNS: &str = "id, user_id, image_url, prompt_id, style_type, is_simulated, created_at";

pub struct UserHeadshotRepo;

impl UserHeadshotRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateUserHeadshot,
    ) -> Result<UserHeadshot, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_headshots (user_id, image_url, prompt_id, style_type, is_simulated)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserHeadshot>(&query)
            .bind(input.user_id)
            .bind(&input.image_url)
            .bind(&input.prompt_id)
            .bind(&input.style_type)
            .bind(input.is_simulated)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_user(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Vec<UserHeadshot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_headshots WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, UserHeadshot>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
