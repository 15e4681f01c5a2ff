//! Repository for the `user_tunes` ledger.

use headshots_core::training::LedgerStatus;
use headshots_core::types::UserId;
use sqlx::PgPool;

use crate::models::user_tune::{UpsertUserTune, UserTune};

const COLUMNS: &str =
    "user_id, tune_id, status, is_simulated, notify_email, created_at, updated_at";

pub struct UserTuneRepo;

impl UserTuneRepo {
    /// Insert a ledger row or refresh an existing one.
    ///
    /// `created_at` is preserved on conflict so the synthetic completion
    /// timer keeps counting from the first insert.
    pub async fn upsert(pool: &PgPool, input: &UpsertUserTune) -> Result<UserTune, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_tunes (user_id, tune_id, status, is_simulated, notify_email)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (user_id, tune_id) DO UPDATE SET
                status = EXCLUDED.status,
                is_simulated = EXCLUDED.is_simulated,
                notify_email = COALESCE(EXCLUDED.notify_email, user_tunes.notify_email),
                updated_at = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserTune>(&query)
            .bind(input.user_id)
            .bind(&input.tune_id)
            .bind(input.status.as_str())
            .bind(input.is_simulated)
            .bind(&input.notify_email)
            .fetch_one(pool)
            .await
    }

    pub async fn find(
        pool: &PgPool,
        user_id: UserId,
        tune_id: &str,
    ) -> Result<Option<UserTune>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_tunes WHERE user_id = $1 AND tune_id = $2");
        sqlx::query_as::<_, UserTune>(&query)
            .bind(user_id)
            .bind(tune_id)
            .fetch_optional(pool)
            .await
    }

    /// The user's most recently created tune.
    pub async fn latest_for_user(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Option<UserTune>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_tunes WHERE user_id = $1
             ORDER BY created_at DESC LIMIT 1"
        );
        sqlx::query_as::<_, UserTune>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// All ledger rows in `status`, oldest first.
    pub async fn list_by_status(
        pool: &PgPool,
        status: LedgerStatus,
    ) -> Result<Vec<UserTune>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_tunes WHERE status = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, UserTune>(&query)
            .bind(status.as_str())
            .fetch_all(pool)
            .await
    }

    /// Move a ledger row from `from` to `to`.
    ///
    /// Returns `false` when the row is missing or no longer in `from`, so
    /// concurrent refreshes of one row apply a transition exactly once.
    pub async fn update_status(
        pool: &PgPool,
        user_id: UserId,
        tune_id: &str,
        from: LedgerStatus,
        to: LedgerStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_tunes SET status = $4, updated_at = now()
             WHERE user_id = $1 AND tune_id = $2 AND status = $3",
        )
        .bind(user_id)
        .bind(tune_id)
        .bind(from.as_str())
        .bind(to.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Backdate `created_at`. Used to age synthetic tunes in tests and
    /// manual QA without waiting for the timer.
    pub async fn set_created_at(
        pool: &PgPool,
        user_id: UserId,
        tune_id: &str,
        created_at: headshots_core::types::Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_tunes SET created_at = $3 WHERE user_id = $1 AND tune_id = $2",
        )
        .bind(user_id)
        .bind(tune_id)
        .bind(created_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
