use std::sync::Arc;

use headshots_astria::AstriaService;
use headshots_events::{EmailDelivery, EventBus};
use headshots_openai::ReactionGenerator;

use crate::auth::Authenticator;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything heavy sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: headshots_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Bearer-token verification and the session cache.
    pub auth: Arc<Authenticator>,
    pub astria: Arc<AstriaService>,
    pub reactions: Arc<ReactionGenerator>,
    /// `None` when neither Resend nor SMTP is configured.
    pub email: Option<Arc<EmailDelivery>>,
    /// Centralized event bus for publishing platform events.
    pub event_bus: Arc<EventBus>,
}
