//! Hourly digest of new consultation requests.
//!
//! Each run moves through
//! `Querying -> (NoWork | HasWork) -> Sending -> MarkingSent`:
//!
//! 1. Load unsent requests, oldest first. None: stop.
//! 2. Load SuperAdmin recipients. None: stop, leave everything unsent.
//! 3. Send one plain-text message to all recipients. Failure: stop, leave
//!    everything unsent.
//! 4. Flag exactly the ids that went into the message.
//!
//! A crash between 3 and 4 re-sends those requests next run, so delivery is
//! at-least-once. [`DigestScheduler`] drives [`ContactDigest::run_once`] on a
//! fixed interval until cancelled.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use inotebook_core::types::DbId;
use inotebook_db::models::contact_request::ContactRequest;
use inotebook_db::repositories::{ContactRequestRepo, UserRepo};
use inotebook_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::delivery::email::{EmailError, MailTransport, OutboundEmail};

/// Default time between digest runs.
const DEFAULT_DIGEST_INTERVAL_SECS: u64 = 3600;

// ---------------------------------------------------------------------------
// Errors and outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("Digest storage error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Digest delivery error: {0}")]
    Delivery(#[from] EmailError),
}

/// How a single run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigestOutcome {
    /// Nothing was pending.
    NoWork,
    /// Requests were pending but nobody could receive them. Nothing marked.
    NoRecipients { pending: usize },
    /// The digest went out and its requests were marked.
    Sent { requests: usize, recipients: usize },
}

// ---------------------------------------------------------------------------
// Storage seam
// ---------------------------------------------------------------------------

/// Storage operations the digest needs.
#[async_trait]
pub trait DigestStore: Send + Sync {
    /// Requests not yet included in a sent digest, oldest first.
    async fn unsent_requests(&self) -> Result<Vec<ContactRequest>, sqlx::Error>;

    /// Addresses that should receive the digest.
    async fn recipients(&self) -> Result<Vec<String>, sqlx::Error>;

    /// Flag exactly `ids` as emailed.
    async fn mark_emailed(&self, ids: &[DbId]) -> Result<u64, sqlx::Error>;
}

/// Postgres-backed [`DigestStore`].
pub struct PgDigestStore {
    pool: DbPool,
}

impl PgDigestStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DigestStore for PgDigestStore {
    async fn unsent_requests(&self) -> Result<Vec<ContactRequest>, sqlx::Error> {
        ContactRequestRepo::list_unsent_oldest_first(&self.pool).await
    }

    async fn recipients(&self) -> Result<Vec<String>, sqlx::Error> {
        UserRepo::super_admin_emails(&self.pool).await
    }

    async fn mark_emailed(&self, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        ContactRequestRepo::mark_emailed(&self.pool, ids).await
    }
}

// ---------------------------------------------------------------------------
// ContactDigest
// ---------------------------------------------------------------------------

/// One digest pass over pending consultation requests.
#[derive(Clone)]
pub struct ContactDigest {
    store: Arc<dyn DigestStore>,
    mailer: Arc<dyn MailTransport>,
}

impl ContactDigest {
    pub fn new(store: Arc<dyn DigestStore>, mailer: Arc<dyn MailTransport>) -> Self {
        Self { store, mailer }
    }

    /// Execute a single run.
    pub async fn run_once(&self) -> Result<DigestOutcome, DigestError> {
        let pending = self.store.unsent_requests().await?;
        if pending.is_empty() {
            tracing::debug!("No new consultation requests to email");
            return Ok(DigestOutcome::NoWork);
        }
        tracing::info!(count = pending.len(), "Found unsent consultation requests");

        let recipients = self.store.recipients().await?;
        if recipients.is_empty() {
            tracing::warn!(
                pending = pending.len(),
                "No SuperAdmin users found; digest not sent"
            );
            return Ok(DigestOutcome::NoRecipients {
                pending: pending.len(),
            });
        }

        let email = compose_digest(&pending, recipients);
        self.mailer.send(&email).await?;

        let ids: Vec<DbId> = pending.iter().map(|r| r.id).collect();
        let marked = self.store.mark_emailed(&ids).await?;
        tracing::info!(
            requests = ids.len(),
            marked,
            recipients = email.recipients.len(),
            "Consultation digest sent"
        );

        Ok(DigestOutcome::Sent {
            requests: ids.len(),
            recipients: email.recipients.len(),
        })
    }
}

/// Render the digest message for `requests`.
pub fn compose_digest(requests: &[ContactRequest], recipients: Vec<String>) -> OutboundEmail {
    let count = requests.len();
    let subject = format!("[{count}] New Consultation Request(s) - Hourly Summary");

    let mut body = String::new();
    let _ = writeln!(body, "Hourly Consultation Requests Summary");
    let _ = writeln!(body);
    let _ = writeln!(
        body,
        "Received {count} new request(s) since the last summary:"
    );

    for (i, req) in requests.iter().enumerate() {
        let _ = writeln!(body);
        let _ = writeln!(body, "{}. Name: {}", i + 1, req.name);
        let _ = writeln!(body, "   Email: {}", req.email);
        if let Some(company) = &req.company {
            let _ = writeln!(body, "   Company: {company}");
        }
        let _ = writeln!(
            body,
            "   Received: {}",
            req.created_at.format("%Y-%m-%d %H:%M UTC")
        );
        let _ = writeln!(body, "   Message:");
        for line in req.message.lines() {
            let _ = writeln!(body, "     {line}");
        }
    }

    let _ = writeln!(body);
    let _ = writeln!(
        body,
        "Please log in to the dashboard to manage these requests."
    );

    OutboundEmail {
        recipients,
        subject,
        body,
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Digest timing configuration.
#[derive(Debug, Clone)]
pub struct DigestConfig {
    pub interval: Duration,
}

impl DigestConfig {
    /// Load from `DIGEST_INTERVAL_SECS` (default 3600).
    pub fn from_env() -> Self {
        let secs = std::env::var("DIGEST_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_DIGEST_INTERVAL_SECS);
        Self {
            interval: Duration::from_secs(secs),
        }
    }
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_DIGEST_INTERVAL_SECS),
        }
    }
}

/// Background service that runs the contact digest periodically.
pub struct DigestScheduler {
    digest: ContactDigest,
    config: DigestConfig,
}

impl DigestScheduler {
    pub fn new(digest: ContactDigest, config: DigestConfig) -> Self {
        Self { digest, config }
    }

    /// Run the digest loop.
    ///
    /// A failed run is logged and retried on the next tick. The loop exits
    /// when the provided [`CancellationToken`] is cancelled.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            "Contact digest scheduler started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Contact digest scheduler cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.digest.run_once().await {
                        tracing::error!(error = %e, "Contact digest run failed");
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
