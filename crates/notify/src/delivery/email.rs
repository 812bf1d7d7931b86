//! Outbound email via SMTP.
//!
//! [`SmtpMailer`] wraps the `lettre` async SMTP transport and is built once
//! at startup from [`EmailConfig`]. Callers depend on the [`MailTransport`]
//! trait so tests can substitute a recording double. If `SMTP_HOST` is not
//! set, [`EmailConfig::from_env`] returns `None` and no mailer should be
//! constructed.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// A message was handed over with an empty recipient list.
    #[error("Email has no recipients")]
    NoRecipients,
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Port that implies implicit TLS instead of STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@inotebook.local";

/// Display name on outgoing mail.
const SENDER_NAME: &str = "Website Notifications";

/// Configuration for the SMTP mailer.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default                    |
    /// |-----------------|----------|----------------------------|
    /// | `SMTP_HOST`     | yes      | --                         |
    /// | `SMTP_PORT`     | no       | `587`                      |
    /// | `SMTP_FROM`     | no       | `noreply@inotebook.local`  |
    /// | `SMTP_USER`     | no       | --                         |
    /// | `SMTP_PASSWORD` | no       | --                         |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST")
            .ok()
            .filter(|h| !h.trim().is_empty())?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// Transport abstraction
// ---------------------------------------------------------------------------

/// A plain-text message addressed to one or more recipients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Anything that can deliver an [`OutboundEmail`].
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver `email` to every recipient in one message.
    async fn send(&self, email: &OutboundEmail) -> Result<(), EmailError>;
}

// ---------------------------------------------------------------------------
// SmtpMailer
// ---------------------------------------------------------------------------

/// SMTP-backed [`MailTransport`]. The connection pool inside the transport is
/// created once and reused for every send.
pub struct SmtpMailer {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build the transport from `config`.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let from_address: Address = config.from_address.parse()?;
        let from = Mailbox::new(Some(SENDER_NAME.to_string()), from_address);

        let builder = if config.smtp_port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
        };
        let mut builder = builder.port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            from,
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), EmailError> {
        let message = build_message(&self.from, email)?;
        self.transport.send(message).await?;
        tracing::info!(
            recipients = email.recipients.len(),
            subject = %email.subject,
            "Email sent"
        );
        Ok(())
    }
}

/// Assemble a MIME message with every recipient on the `To` line.
fn build_message(from: &Mailbox, email: &OutboundEmail) -> Result<Message, EmailError> {
    if email.recipients.is_empty() {
        return Err(EmailError::NoRecipients);
    }

    let mut builder = Message::builder()
        .from(from.clone())
        .subject(email.subject.clone())
        .header(ContentType::TEXT_PLAIN);
    for recipient in &email.recipients {
        builder = builder.to(recipient.parse()?);
    }

    builder
        .body(email.body.clone())
        .map_err(|e| EmailError::Build(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
