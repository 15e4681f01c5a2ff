use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use headshots_api::auth::Authenticator;
use headshots_api::background::training_monitor::TrainingMonitor;
use headshots_api::config::ServerConfig;
use headshots_api::router::build_app_router;
use headshots_api::state::AppState;
use headshots_astria::{AstriaConfig, AstriaService};
use headshots_events::{EmailConfig, EmailDelivery, EventBus, TrainingNotifier};
use headshots_openai::{ChatClient, OpenAiConfig, ReactionGenerator};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "headshots_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = headshots_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    headshots_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    headshots_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- External services ---
    let astria = Arc::new(AstriaService::new(AstriaConfig::from_env()));
    if !astria.is_enabled() {
        tracing::warn!("ASTRIA_API_KEY not set, all Astria results will be simulated");
    }

    let chat = ChatClient::new(OpenAiConfig::from_env());
    if !chat.is_enabled() {
        tracing::warn!("OPENAI_API_KEY not set, reactions will use canned text");
    }
    let reactions = Arc::new(ReactionGenerator::new(chat));

    let email = EmailConfig::from_env().map(|c| Arc::new(EmailDelivery::new(c)));
    if email.is_none() {
        tracing::warn!("No email backend configured, training notifications are disabled");
    }

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    let cancel = CancellationToken::new();

    let notifier_handle = email.as_ref().map(|delivery| {
        let notifier = TrainingNotifier::new(Arc::clone(delivery), config.site_url.clone());
        let receiver = event_bus.subscribe();
        let cancel = cancel.clone();
        tokio::spawn(async move { notifier.run(receiver, cancel).await })
    });

    // --- Training monitor ---
    let monitor_handle = config.training_monitor_enabled.then(|| {
        let monitor = TrainingMonitor::new(pool.clone(), Arc::clone(&astria), Arc::clone(&event_bus));
        let cancel = cancel.clone();
        tokio::spawn(async move { monitor.run(cancel).await })
    });

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        auth: Arc::new(Authenticator::new(&config.auth)),
        astria,
        reactions,
        email,
        event_bus: Arc::clone(&event_bus),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    cancel.cancel();
    if let Some(handle) = monitor_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        tracing::info!("Training monitor stopped");
    }
    if let Some(handle) = notifier_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        tracing::info!("Training notifier stopped");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
