//! Repository for the `users` table.

use inotebook_core::roles::{Role, ROLE_SUPER_ADMIN};
use inotebook_core::types::DbId;
use inotebook_core::user::ProfileChanges;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, role, country, city, about, \
                       profile_picture_url, profile_picture_public_id, google_id, \
                       created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// A duplicate email fails on `uq_users_email`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash, country, city, about, \
                                google_id, profile_picture_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.country)
            .bind(&input.city)
            .bind(&input.about)
            .bind(&input.google_id)
            .bind(&input.profile_picture_url)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email. Emails are stored lowercase.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by Google subject id.
    pub async fn find_by_google_id(
        pool: &PgPool,
        google_id: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE google_id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(google_id)
            .fetch_optional(pool)
            .await
    }

    /// Attach a Google identity to an existing account. The picture is only
    /// filled in when the account has none.
    pub async fn link_google(
        pool: &PgPool,
        id: DbId,
        google_id: &str,
        picture_url: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                google_id = $2,
                profile_picture_url = COALESCE(profile_picture_url, $3)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(google_id)
            .bind(picture_url)
            .fetch_optional(pool)
            .await
    }

    /// Apply profile edits. Only non-`None` fields are written.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                country = COALESCE($3, country),
                city = COALESCE($4, city),
                about = COALESCE($5, about)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.country)
            .bind(&changes.city)
            .bind(&changes.about)
            .fetch_optional(pool)
            .await
    }

    /// Change a user's role. Not reachable from any client-facing route.
    pub async fn set_role(pool: &PgPool, id: DbId, role: Role) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
            .bind(id)
            .bind(role.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Email addresses of every SuperAdmin, the digest recipients.
    pub async fn super_admin_emails(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT email FROM users WHERE role = $1 ORDER BY id")
            .bind(ROLE_SUPER_ADMIN)
            .fetch_all(pool)
            .await
    }
}
