//! Emails tune owners when training finishes.
//!
//! [`TrainingNotifier`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and reacts to [`TUNE_COMPLETED`](crate::TUNE_COMPLETED) events whose
//! payload carries a `notify_email`. Delivery failures are logged and never
//! retried.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::bus::PlatformEvent;
use crate::delivery::email::EmailDelivery;
use crate::TUNE_COMPLETED;

pub struct TrainingNotifier {
    email: Arc<EmailDelivery>,
    site_url: String,
}

impl TrainingNotifier {
    pub fn new(email: Arc<EmailDelivery>, site_url: impl Into<String>) -> Self {
        Self {
            email,
            site_url: site_url.into(),
        }
    }

    /// Consume events until cancelled or the bus is dropped.
    pub async fn run(
        &self,
        mut receiver: broadcast::Receiver<PlatformEvent>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Training notifier cancelled");
                    break;
                }
                received = receiver.recv() => match received {
                    Ok(event) => {
                        self.handle(&event).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Training notifier lagged, some events were dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Event bus closed, training notifier shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Returns `true` when an email was sent.
    pub async fn handle(&self, event: &PlatformEvent) -> bool {
        if event.event_type != TUNE_COMPLETED {
            return false;
        }
        let Some(tune_id) = event.source_entity_id.as_deref() else {
            return false;
        };
        let Some(to) = event.payload_str("notify_email") else {
            tracing::debug!(tune_id, "Completed tune has no notification address");
            return false;
        };

        match self
            .email
            .send_training_ready(to, &self.site_url, tune_id, event.payload_str("user_name"))
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(tune_id, error = %e, "Failed to send training notification");
                false
            }
        }
    }
}
