//! Repository for the `contact_requests` table.

use inotebook_core::contact::ContactStatus;
use inotebook_core::types::DbId;
use sqlx::PgPool;

use crate::models::contact_request::{ContactRequest, CreateContactRequest};

/// Column list for `contact_requests` queries.
const COLUMNS: &str = "id, name, email, company, message, status, emailed_in_batch, \
                       created_at, updated_at";

/// Provides persistence for consultation requests and digest bookkeeping.
pub struct ContactRequestRepo;

impl ContactRequestRepo {
    /// Store a new request. Status starts at `New`, not yet emailed.
    pub async fn create(
        pool: &PgPool,
        input: &CreateContactRequest,
    ) -> Result<ContactRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO contact_requests (name, email, company, message)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactRequest>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.company)
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ContactRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contact_requests WHERE id = $1");
        sqlx::query_as::<_, ContactRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All requests, newest first.
    pub async fn list_newest_first(pool: &PgPool) -> Result<Vec<ContactRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contact_requests ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ContactRequest>(&query)
            .fetch_all(pool)
            .await
    }

    /// Set a request's follow-up status.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: ContactStatus,
    ) -> Result<Option<ContactRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE contact_requests SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactRequest>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Digest bookkeeping
    // -----------------------------------------------------------------------

    /// Requests not yet included in a sent digest, oldest first.
    pub async fn list_unsent_oldest_first(
        pool: &PgPool,
    ) -> Result<Vec<ContactRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contact_requests \
             WHERE NOT emailed_in_batch \
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, ContactRequest>(&query)
            .fetch_all(pool)
            .await
    }

    /// Flag exactly `ids` as emailed. Rows already flagged are left alone.
    ///
    /// Returns the number of rows flipped.
    pub async fn mark_emailed(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "UPDATE contact_requests SET emailed_in_batch = true \
             WHERE id = ANY($1) AND NOT emailed_in_batch",
        )
        .bind(ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
