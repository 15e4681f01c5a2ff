//! Event bus and notification delivery.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`] -- the event envelope.
//! - [`delivery::email`] -- transactional email through Resend or SMTP.
//! - [`TrainingNotifier`] -- emails the tune owner when training finishes.

pub mod bus;
pub mod delivery;
pub mod notifier;

pub use bus::{EventBus, PlatformEvent};
pub use delivery::email::{EmailConfig, EmailDelivery, EmailError};
pub use notifier::TrainingNotifier;

/// Event published when a tune reaches `complete`.
pub const TUNE_COMPLETED: &str = "tune.completed";

/// Event published when a tune reaches `error`.
pub const TUNE_FAILED: &str = "tune.failed";
