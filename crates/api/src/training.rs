//! Status refresh shared by the request handlers and the training monitor.
//!
//! Both ledgers are refreshed independently: a `user_tunes` row is never
//! used to update a `models` row or the other way around. A row is written
//! only when its status changed, as a compare-and-set against the status
//! that was read, so a terminal transition is published on the event bus
//! once even when the monitor and a request refresh the same row together.

use headshots_astria::AstriaService;
use headshots_core::sourced::Sourced;
use headshots_core::training::{LedgerStatus, ModelStatus};
use headshots_db::models::model::Model;
use headshots_db::models::user_tune::UserTune;
use headshots_db::repositories::{ModelRepo, ProfileRepo, UserTuneRepo};
use headshots_events::{EventBus, PlatformEvent, TUNE_COMPLETED, TUNE_FAILED};
use serde_json::json;
use sqlx::PgPool;

/// Re-check one `user_tunes` row and persist a changed status.
pub async fn refresh_user_tune(
    pool: &PgPool,
    astria: &AstriaService,
    bus: &EventBus,
    tune: &UserTune,
) -> Result<Sourced<LedgerStatus>, sqlx::Error> {
    let stored = tune.status();
    let checked = astria
        .check_status(&tune.tune_id, stored, tune.created_at)
        .await;
    let current = *checked.as_ref().into_inner();

    if current == stored {
        return Ok(checked);
    }

    let applied =
        UserTuneRepo::update_status(pool, tune.user_id, &tune.tune_id, stored, current).await?;
    if !applied {
        tracing::debug!(
            user_id = %tune.user_id,
            tune_id = %tune.tune_id,
            "Tune status already moved by another refresh"
        );
        return Ok(checked);
    }
    tracing::info!(
        user_id = %tune.user_id,
        tune_id = %tune.tune_id,
        from = %stored,
        to = %current,
        source = checked.label(),
        "Tune status changed"
    );

    if let Some(event_type) = transition_event(current) {
        let user_name = match ProfileRepo::find_by_id(pool, tune.user_id).await {
            Ok(profile) => profile.and_then(|p| p.first_name),
            Err(e) => {
                tracing::warn!(
                    user_id = %tune.user_id,
                    error = %e,
                    "Profile lookup failed, notifying without a name"
                );
                None
            }
        };
        bus.publish(
            PlatformEvent::new(event_type)
                .with_source("tune", &tune.tune_id)
                .with_actor(tune.user_id)
                .with_payload(json!({
                    "ledger": "user_tunes",
                    "notify_email": tune.notify_email,
                    "user_name": user_name,
                    "simulated": checked.is_simulated(),
                })),
        );
    }

    Ok(checked)
}

/// Re-check one `models` row and persist a changed status.
///
/// Models without a tune id or already in a terminal state are returned
/// as stored without calling out.
pub async fn refresh_model(
    pool: &PgPool,
    astria: &AstriaService,
    bus: &EventBus,
    model: Model,
) -> Result<(Model, Sourced<ModelStatus>), sqlx::Error> {
    let stored = model.status();
    let simulated = model.is_simulated;
    let tag = move |status: ModelStatus| {
        if simulated {
            Sourced::Simulated(status)
        } else {
            Sourced::Real(status)
        }
    };

    let Some(tune_id) = model.tune_id.clone() else {
        return Ok((model, tag(stored)));
    };
    if stored.is_terminal() {
        return Ok((model, tag(stored)));
    }

    let checked = astria
        .check_status(&tune_id, stored.ledger_status(), model.created_at)
        .await;
    let ledger = *checked.as_ref().into_inner();

    // `processing` and `training` both read as training; keep the finer state.
    if ledger == stored.ledger_status() {
        return Ok((model, checked.map(|_| stored)));
    }

    let next = ModelStatus::from(ledger);
    let Some(updated) = ModelRepo::update_status(pool, model.id, stored, next).await? else {
        tracing::debug!(model_id = model.id, "Model status already moved by another refresh");
        let current = ModelRepo::find_by_id(pool, model.id).await?.unwrap_or(model);
        let status = current.status();
        return Ok((current, checked.map(|_| status)));
    };
    tracing::info!(
        model_id = updated.id,
        tune_id = %tune_id,
        from = %stored,
        to = %next,
        source = checked.label(),
        "Model status changed"
    );

    if let Some(event_type) = transition_event(ledger) {
        bus.publish(
            PlatformEvent::new(event_type)
                .with_source("model", updated.id)
                .with_actor(updated.user_id)
                .with_payload(json!({
                    "ledger": "models",
                    "model_id": updated.id,
                    "tune_id": tune_id,
                    "simulated": checked.is_simulated(),
                })),
        );
    }

    Ok((updated, checked.map(|_| next)))
}

fn transition_event(status: LedgerStatus) -> Option<&'static str> {
    match status {
        LedgerStatus::Complete => Some(TUNE_COMPLETED),
        LedgerStatus::Error => Some(TUNE_FAILED),
        LedgerStatus::Training => None,
    }
}
