//! User entity model and DTOs.

use inotebook_core::error::CoreError;
use inotebook_core::roles::Role;
use inotebook_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    /// `None` for accounts that only sign in through Google.
    pub password_hash: Option<String>,
    pub role: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub about: String,
    pub profile_picture_url: Option<String>,
    pub profile_picture_public_id: Option<String>,
    pub google_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Parsed role. The `ck_users_role` constraint keeps this infallible in
    /// practice.
    pub fn role(&self) -> Result<Role, CoreError> {
        self.role.parse()
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub about: String,
    pub profile_picture_url: Option<String>,
    pub profile_picture_public_id: Option<String>,
    pub has_google_login: bool,
    pub date: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            has_google_login: user.google_id.is_some(),
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            country: user.country,
            city: user.city,
            about: user.about,
            profile_picture_url: user.profile_picture_url,
            profile_picture_public_id: user.profile_picture_public_id,
            date: user.created_at,
        }
    }
}

/// DTO for inserting a user. Role always starts as `user`.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub about: String,
    pub google_id: Option<String>,
    pub profile_picture_url: Option<String>,
}
