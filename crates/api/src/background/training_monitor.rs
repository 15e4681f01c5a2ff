//! Periodic refresh of tunes that are still training.
//!
//! Every [`POLL_INTERVAL`] the monitor re-checks each `user_tunes` row in
//! `training` and each `models` row in `training` or `processing`. Checks
//! run one after another and a tick that falls behind is skipped. A
//! `check-status` request may refresh the same row concurrently; the shared
//! refresh functions apply each transition once and publish it on the
//! event bus.

use std::sync::Arc;

use headshots_astria::AstriaService;
use headshots_core::training::{LedgerStatus, ModelStatus, POLL_INTERVAL};
use headshots_db::repositories::{ModelRepo, UserTuneRepo};
use headshots_events::EventBus;
use sqlx::PgPool;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::training::{refresh_model, refresh_user_tune};

/// Counts from one pass over both ledgers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    pub checked: usize,
    pub finished: usize,
    pub failed_checks: usize,
}

pub struct TrainingMonitor {
    pool: PgPool,
    astria: Arc<AstriaService>,
    event_bus: Arc<EventBus>,
}

impl TrainingMonitor {
    pub fn new(pool: PgPool, astria: Arc<AstriaService>, event_bus: Arc<EventBus>) -> Self {
        Self {
            pool,
            astria,
            event_bus,
        }
    }

    /// Run until `cancel` is triggered.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = POLL_INTERVAL.as_secs(),
            "Training monitor started"
        );

        let mut interval = tokio::time::interval(POLL_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Training monitor stopping");
                    break;
                }
                _ = interval.tick() => {
                    let summary = self.tick().await;
                    if summary.checked > 0 {
                        tracing::debug!(
                            checked = summary.checked,
                            finished = summary.finished,
                            failed_checks = summary.failed_checks,
                            "Training monitor tick"
                        );
                    }
                }
            }
        }
    }

    /// One pass over both ledgers.
    pub async fn tick(&self) -> TickSummary {
        let mut summary = TickSummary::default();

        match UserTuneRepo::list_by_status(&self.pool, LedgerStatus::Training).await {
            Ok(tunes) => {
                for tune in &tunes {
                    summary.checked += 1;
                    match refresh_user_tune(&self.pool, &self.astria, &self.event_bus, tune).await
                    {
                        Ok(status) if status.as_ref().into_inner().is_terminal() => {
                            summary.finished += 1;
                        }
                        Ok(_) => {}
                        Err(e) => {
                            summary.failed_checks += 1;
                            tracing::error!(tune_id = %tune.tune_id, error = %e, "Tune refresh failed");
                        }
                    }
                }
            }
            Err(e) => tracing::error!(error = %e, "Training monitor: listing tunes failed"),
        }

        let in_flight = [ModelStatus::Training, ModelStatus::Processing];
        match ModelRepo::list_by_statuses(&self.pool, &in_flight).await {
            Ok(models) => {
                for model in models {
                    summary.checked += 1;
                    let model_id = model.id;
                    match refresh_model(&self.pool, &self.astria, &self.event_bus, model).await {
                        Ok((_, status)) if status.as_ref().into_inner().is_terminal() => {
                            summary.finished += 1;
                        }
                        Ok(_) => {}
                        Err(e) => {
                            summary.failed_checks += 1;
                            tracing::error!(model_id, error = %e, "Model refresh failed");
                        }
                    }
                }
            }
            Err(e) => tracing::error!(error = %e, "Training monitor: listing models failed"),
        }

        summary
    }
}
