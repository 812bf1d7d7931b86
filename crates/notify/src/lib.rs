//! Outbound notifications for the inotebook backend.
//!
//! - [`delivery`]: the [`MailTransport`] seam and its SMTP implementation.
//! - [`digest`]: the batch notifier that emails new consultation requests
//!   to SuperAdmins, plus the [`DigestScheduler`] loop that drives it.

pub mod delivery;
pub mod digest;

pub use delivery::email::{EmailConfig, EmailError, MailTransport, OutboundEmail, SmtpMailer};
pub use digest::{
    ContactDigest, DigestConfig, DigestError, DigestOutcome, DigestScheduler, DigestStore,
    PgDigestStore,
};
