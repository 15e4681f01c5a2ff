//! Repository for the `samples` table.

use headshots_core::types::DbId;
use sqlx::PgPool;

use crate::models::sample::Sample;

const COLUMNS: &str = "id, modelid, image_id, created_at";

pub struct SampleRepo;

impl SampleRepo {
    pub async fn create(
        pool: &PgPool,
        model_id: DbId,
        image_id: &str,
    ) -> Result<Sample, sqlx::Error> {
        let query = format!(
            "INSERT INTO samples (modelid, image_id) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sample>(&query)
            .bind(model_id)
            .bind(image_id)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_model(pool: &PgPool, model_id: DbId) -> Result<Vec<Sample>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM samples WHERE modelid = $1 ORDER BY id ASC");
        sqlx::query_as::<_, Sample>(&query)
            .bind(model_id)
            .fetch_all(pool)
            .await
    }
}
