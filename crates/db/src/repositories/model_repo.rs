//! Repository for the `models` table.

use headshots_core::training::ModelStatus;
use headshots_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::model::{CreateModel, Model};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, modelid, name, status, type, is_simulated, created_at";

/// Provides CRUD operations for trained models.
pub struct ModelRepo;

impl ModelRepo {
    /// Insert a new model, returning the created row.
    ///
    /// If `status` is `None`, defaults to `pending`.
    pub async fn create(pool: &PgPool, input: &CreateModel) -> Result<Model, sqlx::Error> {
        let query = format!(
            "INSERT INTO models (user_id, name, type, status)
             VALUES ($1, $2, $3, COALESCE($4, 'pending'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Model>(&query)
            .bind(input.user_id)
            .bind(&input.name)
            .bind(&input.model_type)
            .bind(input.status.map(ModelStatus::as_str))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Model>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM models WHERE id = $1");
        sqlx::query_as::<_, Model>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's models, most recently created first.
    pub async fn list_by_user(pool: &PgPool, user_id: UserId) -> Result<Vec<Model>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM models WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Model>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List models in any of the given statuses, oldest first.
    pub async fn list_by_statuses(
        pool: &PgPool,
        statuses: &[ModelStatus],
    ) -> Result<Vec<Model>, sqlx::Error> {
        let statuses: Vec<&str> = statuses.iter().map(|s| s.as_str()).collect();
        let query = format!(
            "SELECT {COLUMNS} FROM models WHERE status = ANY($1) ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Model>(&query)
            .bind(&statuses)
            .fetch_all(pool)
            .await
    }

    /// Record the external tune id and whether it is synthetic.
    pub async fn set_tune(
        pool: &PgPool,
        id: DbId,
        tune_id: &str,
        is_simulated: bool,
        status: ModelStatus,
    ) -> Result<Option<Model>, sqlx::Error> {
        let query = format!(
            "UPDATE models SET modelid = $2, is_simulated = $3, status = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Model>(&query)
            .bind(id)
            .bind(tune_id)
            .bind(is_simulated)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Move a model from `from` to `to`.
    ///
    /// Returns `None` if no row with the given `id` is still in `from`.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        from: ModelStatus,
        to: ModelStatus,
    ) -> Result<Option<Model>, sqlx::Error> {
        let query = format!(
            "UPDATE models SET status = $3 WHERE id = $1 AND status = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Model>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(pool)
            .await
    }
}
