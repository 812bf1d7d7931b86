//! External delivery channels.
//!
//! Only SMTP email is wired today; everything above this module talks to the
//! [`email::MailTransport`] trait.

pub mod email;
