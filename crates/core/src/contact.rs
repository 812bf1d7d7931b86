//! Consultation requests submitted through the public contact form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::error::CoreError;

pub const CONTACT_NAME_MIN_LEN: usize = 2;
pub const CONTACT_MESSAGE_MIN_LEN: usize = 10;

/// Follow-up state of a request. Persisted by its variant name, matching
/// the `ck_contact_requests_status` constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactStatus {
    New,
    Contacted,
    Closed,
    Archived,
}

impl ContactStatus {
    pub const ALL: [ContactStatus; 4] = [Self::New, Self::Contacted, Self::Closed, Self::Archived];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Contacted => "Contacted",
            Self::Closed => "Closed",
            Self::Archived => "Archived",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "status must be one of New, Contacted, Closed, Archived (got '{s}')"
                ))
            })
    }
}

/// A validated, normalized contact form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: String,
}

/// Validate raw form fields.
///
/// Fields are trimmed, the email is lowercased, and a blank company becomes
/// `None`.
pub fn validate_submission(
    name: &str,
    email: &str,
    company: Option<&str>,
    message: &str,
) -> Result<ContactSubmission, CoreError> {
    let name = name.trim();
    if name.chars().count() < CONTACT_NAME_MIN_LEN {
        return Err(CoreError::Validation(format!(
            "name must be at least {CONTACT_NAME_MIN_LEN} characters"
        )));
    }

    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(CoreError::Validation(
            "email must be a valid email address".into(),
        ));
    }

    let message = message.trim();
    if message.chars().count() < CONTACT_MESSAGE_MIN_LEN {
        return Err(CoreError::Validation(format!(
            "message must be at least {CONTACT_MESSAGE_MIN_LEN} characters"
        )));
    }

    let company = company
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    Ok(ContactSubmission {
        name: name.to_string(),
        email,
        company,
        message: message.to_string(),
    })
}
