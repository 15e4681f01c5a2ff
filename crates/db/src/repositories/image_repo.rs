//! Repository for the `images` table.

use headshots_core::types::DbId;
use sqlx::PgPool;

use crate::models::image::{CreateImage, Image};

const COLUMNS: &str = "id, modelid, uri, is_simulated, created_at";

pub struct ImageRepo;

impl ImageRepo {
    pub async fn create(pool: &PgPool, input: &CreateImage) -> Result<Image, sqlx::Error> {
        let query = format!(
            "INSERT INTO images (modelid, uri, is_simulated)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(input.model_id)
            .bind(&input.uri)
            .bind(input.is_simulated)
            .fetch_one(pool)
            .await
    }

    /// Gallery for a model, newest first.
    pub async fn list_by_model(pool: &PgPool, model_id: DbId) -> Result<Vec<Image>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM images WHERE modelid = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(model_id)
            .fetch_all(pool)
            .await
    }
}
