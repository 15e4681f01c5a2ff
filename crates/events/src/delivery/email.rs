//! Transactional email.
//!
//! Two transports sit behind [`EmailTransport`]: Resend's HTTP API, used when
//! `RESEND_API_KEY` is set, and SMTP via `lettre` when only `SMTP_HOST` is.
//! With neither configured [`EmailConfig::from_env`] returns `None` and no
//! mail is sent.

use std::time::Duration;

use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Resend API error ({status}): {body}")]
    Api { status: u16, body: String },
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";
const DEFAULT_FROM_ADDRESS: &str = "AI Headshots <onboarding@resend.dev>";
const RESEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailBackend {
    Resend {
        api_key: String,
        api_url: String,
    },
    Smtp {
        host: String,
        port: u16,
        user: Option<String>,
        password: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub backend: EmailBackend,
    /// RFC 5322 "From" mailbox.
    pub from_address: String,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Resend wins when both backends are configured.
    ///
    /// | Variable         | Default                                 |
    /// |------------------|-----------------------------------------|
    /// | `RESEND_API_KEY` | unset                                   |
    /// | `RESEND_API_URL` | `https://api.resend.com`                |
    /// | `RESEND_FROM`    | `AI Headshots <onboarding@resend.dev>`  |
    /// | `SMTP_HOST`      | unset                                   |
    /// | `SMTP_PORT`      | `587`                                   |
    /// | `SMTP_FROM`      | falls back to `RESEND_FROM`'s default   |
    /// | `SMTP_USER`      | unset                                   |
    /// | `SMTP_PASSWORD`  | unset                                   |
    pub fn from_env() -> Option<Self> {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());

        if let Some(api_key) = env("RESEND_API_KEY") {
            return Some(Self {
                backend: EmailBackend::Resend {
                    api_key,
                    api_url: env("RESEND_API_URL")
                        .unwrap_or_else(|| DEFAULT_RESEND_API_URL.to_string())
                        .trim_end_matches('/')
                        .to_string(),
                },
                from_address: env("RESEND_FROM")
                    .unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            });
        }

        let host = env("SMTP_HOST")?;
        Some(Self {
            backend: EmailBackend::Smtp {
                host,
                port: env("SMTP_PORT")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(DEFAULT_SMTP_PORT),
                user: env("SMTP_USER"),
                password: env("SMTP_PASSWORD"),
            },
            from_address: env("SMTP_FROM").unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Dashboard link for a tune. The id is percent-encoded as one path segment.
pub fn tune_dashboard_url(site_url: &str, tune_id: &str) -> String {
    format!(
        "{}/dashboard/tunes/{}",
        site_url.trim_end_matches('/'),
        urlencoding::encode(tune_id)
    )
}

/// "Your model is ready" email.
pub fn training_ready_message(
    to: &str,
    site_url: &str,
    tune_id: &str,
    user_name: Option<&str>,
) -> EmailMessage {
    let greeting = match user_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("Hi {},", escape_html(name)),
        None => "Hi there,".to_string(),
    };
    let link = tune_dashboard_url(site_url, tune_id);
    let html = format!(
        "<div style=\"font-family: sans-serif; line-height: 1.5\">\
         <p>{greeting}</p>\
         <p>Your AI headshot model has finished training and is ready to use.</p>\
         <p><a href=\"{link}\">Generate your headshots</a></p>\
         <p style=\"color: #666; font-size: 12px\">Model ID: {tune}</p>\
         </div>",
        link = escape_html(&link),
        tune = escape_html(tune_id),
    );
    EmailMessage {
        to: to.to_string(),
        subject: "Your AI headshot model is ready".to_string(),
        html,
    }
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ---------------------------------------------------------------------------
// Transports
// ---------------------------------------------------------------------------

#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, from: &str, message: &EmailMessage) -> Result<(), EmailError>;

    fn name(&self) -> &'static str;
}

/// Resend `POST /emails`.
pub struct ResendTransport {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl ResendTransport {
    pub fn new(api_key: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            api_url: api_url.into(),
        }
    }
}

#[async_trait]
impl EmailTransport for ResendTransport {
    async fn send(&self, from: &str, message: &EmailMessage) -> Result<(), EmailError> {
        let response = self
            .client
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(&self.api_key)
            .timeout(RESEND_TIMEOUT)
            .json(&serde_json::json!({
                "from": from,
                "to": [message.to],
                "subject": message.subject,
                "html": message.html,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "resend"
    }
}

/// STARTTLS SMTP relay.
pub struct SmtpTransport {
    host: String,
    port: u16,
    user: Option<String>,
    password: Option<String>,
}

#[async_trait]
impl EmailTransport for SmtpTransport {
    async fn send(&self, from: &str, message: &EmailMessage) -> Result<(), EmailError> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let email = Message::builder()
            .from(from.parse()?)
            .to(message.to.parse()?)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(message.html.clone())
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)?.port(self.port);
        if let (Some(user), Some(pass)) = (&self.user, &self.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        builder.build().send(email).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

pub struct EmailDelivery {
    transport: Box<dyn EmailTransport>,
    from_address: String,
}

impl EmailDelivery {
    pub fn new(config: EmailConfig) -> Self {
        let transport: Box<dyn EmailTransport> = match config.backend {
            EmailBackend::Resend { api_key, api_url } => {
                Box::new(ResendTransport::new(api_key, api_url))
            }
            EmailBackend::Smtp {
                host,
                port,
                user,
                password,
            } => Box::new(SmtpTransport {
                host,
                port,
                user,
                password,
            }),
        };
        Self::with_transport(transport, config.from_address)
    }

    pub fn with_transport(transport: Box<dyn EmailTransport>, from_address: impl Into<String>) -> Self {
        Self {
            transport,
            from_address: from_address.into(),
        }
    }

    pub async fn deliver(&self, message: &EmailMessage) -> Result<(), EmailError> {
        self.transport.send(&self.from_address, message).await?;
        tracing::info!(
            to = %message.to,
            transport = self.transport.name(),
            subject = %message.subject,
            "Email sent"
        );
        Ok(())
    }

    pub async fn send_training_ready(
        &self,
        to: &str,
        site_url: &str,
        tune_id: &str,
        user_name: Option<&str>,
    ) -> Result<(), EmailError> {
        self.deliver(&training_ready_message(to, site_url, tune_id, user_name))
            .await
    }
}
