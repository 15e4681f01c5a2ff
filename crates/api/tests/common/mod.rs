#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use headshots_api::auth::jwt::generate_access_token;
use headshots_api::auth::{AuthConfig, Authenticator};
use headshots_api::config::ServerConfig;
use headshots_api::router::build_app_router;
use headshots_api::state::AppState;
use headshots_astria::{AstriaConfig, AstriaService};
use headshots_events::{EmailDelivery, EventBus};
use headshots_openai::{ChatClient, OpenAiConfig, ReactionGenerator};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-with-enough-bytes";
pub const SITE_URL: &str = "http://localhost:5173";

/// Build a test `ServerConfig` with safe defaults and local token checks.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        site_url: SITE_URL.to_string(),
        training_monitor_enabled: false,
        auth: AuthConfig::with_jwt_secret(TEST_JWT_SECRET),
    }
}

/// Where the external services of a test app point.
///
/// The default leaves every API key empty, so Astria and OpenAI results are
/// simulated and no email backend exists.
#[derive(Default)]
pub struct Services {
    pub astria_url: Option<String>,
    pub openai_url: Option<String>,
    pub email: Option<Arc<EmailDelivery>>,
    pub auth: Option<AuthConfig>,
}

pub fn build_state(pool: PgPool, services: Services) -> AppState {
    let mut config = test_config();
    if let Some(auth) = services.auth {
        config.auth = auth;
    }

    let astria = match services.astria_url {
        Some(url) => AstriaConfig::with_url("test-astria-key", url),
        None => AstriaConfig::with_url("", "http://127.0.0.1:1"),
    };
    let openai = match services.openai_url {
        Some(url) => OpenAiConfig::with_url("test-openai-key", url),
        None => OpenAiConfig::with_url("", "http://127.0.0.1:1"),
    };

    AppState {
        pool,
        auth: Arc::new(Authenticator::new(&config.auth)),
        config: Arc::new(config),
        astria: Arc::new(AstriaService::new(astria)),
        reactions: Arc::new(ReactionGenerator::new(ChatClient::new(openai))),
        email: services.email,
        event_bus: Arc::new(EventBus::default()),
    }
}

/// Full application router with every external service simulated.
pub fn build_test_app(pool: PgPool) -> Router {
    app_with_state(build_state(pool, Services::default()))
}

pub fn app_with_state(state: AppState) -> Router {
    let config = state.config.as_ref().clone();
    build_app_router(state, &config)
}

/// A signed access token for a fresh user.
pub fn new_user() -> (Uuid, String) {
    let user_id = Uuid::new_v4();
    let token = token_for(user_id, Some("owner@example.com"));
    (user_id, token)
}

pub fn token_for(user_id: Uuid, email: Option<&str>) -> String {
    generate_access_token(user_id, email, TEST_JWT_SECRET, 3600).unwrap()
}

/// A PNG signature as a data URL.
pub fn selfie() -> String {
    "data:image/png;base64,iVBORw0KGgo=".to_string()
}

pub fn selfies(count: usize) -> Vec<String> {
    (0..count).map(|_| selfie()).collect()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
