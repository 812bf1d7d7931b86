//! Consultation request model and DTOs.

use inotebook_core::contact::ContactSubmission;
use inotebook_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `contact_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContactRequest {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: String,
    pub status: String,
    pub emailed_in_batch: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a request from a validated submission.
#[derive(Debug, Clone)]
pub struct CreateContactRequest {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: String,
}

impl From<ContactSubmission> for CreateContactRequest {
    fn from(s: ContactSubmission) -> Self {
        Self {
            name: s.name,
            email: s.email,
            company: s.company,
            message: s.message,
        }
    }
}
