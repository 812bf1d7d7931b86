//! Repository for the `notes` table.
//!
//! Slugs are assigned here at insert time: the candidate sequence is probed
//! for the first free value, and a race lost on `uq_notes_slug` triggers one
//! more probe. Listings use keyset pagination on `id DESC`.

use inotebook_core::error::CoreError;
use inotebook_core::pagination::CursorPage;
use inotebook_core::slug::{base_slug_or_fallback, slug_candidate, MAX_SLUG_ATTEMPTS};
use inotebook_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoError;
use crate::is_unique_violation;
use crate::models::note::{CreateNote, Note, NoteFilter, NoteTitle, NoteView, UpdateNote};

/// Column list for plain `notes` queries.
const COLUMNS: &str = "id, user_id, category_id, title, description, tag, slug, \
                       read_time_minutes, is_featured, created_at, updated_at";

/// Joined projection backing [`NoteView`].
const VIEW_SELECT: &str = "\
    SELECT n.id, n.user_id, u.name AS author_name, u.role AS author_role, \
           u.profile_picture_url AS author_picture_url, \
           n.category_id, c.name AS category_name, \
           n.title, n.description, n.tag, n.slug, n.read_time_minutes, \
           n.is_featured, n.created_at, n.updated_at \
    FROM notes n \
    JOIN users u ON u.id = n.user_id \
    JOIN categories c ON c.id = n.category_id";

/// Predicate shared by page queries and their `has_more` probe.
/// Binds: $1 category, $2 featured-only, $3 ILIKE pattern, $4 cursor.
const FILTER_PREDICATE: &str = "\
    ($1::BIGINT IS NULL OR n.category_id = $1) \
    AND (NOT $2 OR n.is_featured) \
    AND ($3::TEXT IS NULL OR n.title ILIKE $3 OR n.description ILIKE $3 OR n.tag ILIKE $3) \
    AND ($4::BIGINT IS NULL OR n.id < $4)";

/// Slug uniqueness constraint name.
const SLUG_CONSTRAINT: &str = "uq_notes_slug";

/// Provides CRUD, slug assignment, and cursor listings for notes.
pub struct NoteRepo;

impl NoteRepo {
    // -----------------------------------------------------------------------
    // Slugs
    // -----------------------------------------------------------------------

    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM notes WHERE slug = $1)")
            .bind(slug)
            .fetch_one(pool)
            .await
    }

    /// First candidate for `base` not currently taken.
    pub async fn next_available_slug(pool: &PgPool, base: &str) -> Result<String, sqlx::Error> {
        let mut attempt = 1;
        loop {
            let candidate = slug_candidate(base, attempt);
            if !Self::slug_exists(pool, &candidate).await? {
                return Ok(candidate);
            }
            attempt += 1;
        }
    }

    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Insert a note with a freshly assigned slug.
    ///
    /// Losing the slug race twice surfaces as `CoreError::Conflict`.
    pub async fn create(pool: &PgPool, input: &CreateNote) -> Result<Note, RepoError> {
        let base = base_slug_or_fallback(&input.title, chrono::Utc::now().timestamp_millis());

        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let slug = Self::next_available_slug(pool, &base).await?;
            match Self::insert(pool, input, &slug).await {
                Ok(note) => return Ok(note),
                Err(err) if is_unique_violation(&err, SLUG_CONSTRAINT) => {
                    tracing::warn!(%slug, attempt, "Slug taken between probe and insert");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(CoreError::Conflict(format!(
            "Could not assign a unique slug for '{}'; please retry",
            input.title
        ))
        .into())
    }

    async fn insert(pool: &PgPool, input: &CreateNote, slug: &str) -> Result<Note, sqlx::Error> {
        let query = format!(
            "INSERT INTO notes (user_id, category_id, title, description, tag, slug, \
                                read_time_minutes, is_featured)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(input.user_id)
            .bind(input.category_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.tag)
            .bind(slug)
            .bind(input.read_time_minutes)
            .bind(input.is_featured)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notes WHERE id = $1");
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_view(pool: &PgPool, id: DbId) -> Result<Option<NoteView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE n.id = $1");
        sqlx::query_as::<_, NoteView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_view_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<NoteView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE n.slug = $1");
        sqlx::query_as::<_, NoteView>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Patch a note. Only non-`None` fields are written; the slug is kept.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNote,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                tag = COALESCE($4, tag),
                category_id = COALESCE($5, category_id),
                read_time_minutes = COALESCE($6, read_time_minutes),
                is_featured = COALESCE($7, is_featured)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.tag)
            .bind(input.category_id)
            .bind(input.read_time_minutes)
            .bind(input.is_featured)
            .fetch_optional(pool)
            .await
    }

    /// Delete a note, returning the removed row.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("DELETE FROM notes WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Listings
    // -----------------------------------------------------------------------

    /// One keyset page under `filter`, newest first.
    ///
    /// `has_more` is an existence probe below the last returned id under the
    /// same filter, never a count.
    pub async fn list_page(
        pool: &PgPool,
        filter: &NoteFilter,
        cursor: Option<DbId>,
        limit: i64,
    ) -> Result<CursorPage<NoteView>, sqlx::Error> {
        let pattern = filter
            .search
            .as_deref()
            .map(|q| format!("%{}%", escape_like(q)));

        let query = format!("{VIEW_SELECT} WHERE {FILTER_PREDICATE} ORDER BY n.id DESC LIMIT $5");
        let items = sqlx::query_as::<_, NoteView>(&query)
            .bind(filter.category_id)
            .bind(filter.featured_only)
            .bind(&pattern)
            .bind(cursor)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        let Some(last_id) = items.last().map(|n| n.id) else {
            return Ok(CursorPage::empty());
        };

        let probe = format!("SELECT EXISTS(SELECT 1 FROM notes n WHERE {FILTER_PREDICATE})");
        let has_more = sqlx::query_scalar::<_, bool>(&probe)
            .bind(filter.category_id)
            .bind(filter.featured_only)
            .bind(&pattern)
            .bind(Some(last_id))
            .fetch_one(pool)
            .await?;

        Ok(CursorPage::new(items, Some(last_id), has_more))
    }

    /// Every note, newest first.
    pub async fn list_all_views(pool: &PgPool) -> Result<Vec<NoteView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} ORDER BY n.id DESC");
        sqlx::query_as::<_, NoteView>(&query).fetch_all(pool).await
    }

    /// Notes written by `user_id`, newest first.
    pub async fn list_views_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<NoteView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE n.user_id = $1 ORDER BY n.id DESC");
        sqlx::query_as::<_, NoteView>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// The latest `limit` featured notes.
    pub async fn list_featured(pool: &PgPool, limit: i64) -> Result<Vec<NoteView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE n.is_featured ORDER BY n.id DESC LIMIT $1");
        sqlx::query_as::<_, NoteView>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// The latest `limit` notes.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<NoteView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} ORDER BY n.id DESC LIMIT $1");
        sqlx::query_as::<_, NoteView>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Titles in a category, alphabetically.
    pub async fn titles_for_category(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Vec<NoteTitle>, sqlx::Error> {
        sqlx::query_as::<_, NoteTitle>(
            "SELECT id, title, slug FROM notes WHERE category_id = $1 ORDER BY title, id",
        )
        .bind(category_id)
        .fetch_all(pool)
        .await
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_metacharacters_escaped() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }
}
