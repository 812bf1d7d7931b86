//! Note entity model, joined views, and DTOs.

use inotebook_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Note {
    pub id: DbId,
    pub user_id: DbId,
    pub category_id: DbId,
    pub title: String,
    pub description: String,
    pub tag: String,
    pub slug: String,
    pub read_time_minutes: i32,
    pub is_featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A note joined with its author and category, as served to readers.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NoteView {
    pub id: DbId,
    pub user_id: DbId,
    pub author_name: String,
    pub author_role: String,
    pub author_picture_url: Option<String>,
    pub category_id: DbId,
    pub category_name: String,
    pub title: String,
    pub description: String,
    pub tag: String,
    pub slug: String,
    pub read_time_minutes: i32,
    pub is_featured: bool,
    /// Creation time, exposed under the name clients know.
    #[sqlx(rename = "created_at")]
    pub date: Timestamp,
    pub updated_at: Timestamp,
}

/// Title-only projection used for per-category tables of contents.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NoteTitle {
    pub id: DbId,
    pub title: String,
    pub slug: String,
}

/// DTO for inserting a note. The slug is filled in by the repository.
#[derive(Debug, Clone)]
pub struct CreateNote {
    pub user_id: DbId,
    pub category_id: DbId,
    pub title: String,
    pub description: String,
    pub tag: String,
    pub read_time_minutes: i32,
    pub is_featured: bool,
}

/// DTO for patching a note. `None` leaves a column untouched. The slug is
/// never changed.
#[derive(Debug, Clone, Default)]
pub struct UpdateNote {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tag: Option<String>,
    pub category_id: Option<DbId>,
    pub read_time_minutes: Option<i32>,
    pub is_featured: Option<bool>,
}

/// Filter shared by every cursor listing.
#[derive(Debug, Clone, Default)]
pub struct NoteFilter {
    pub category_id: Option<DbId>,
    pub featured_only: bool,
    /// Case-insensitive substring over title, description, and tag.
    pub search: Option<String>,
}

impl NoteFilter {
    pub fn category(category_id: DbId) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::default()
        }
    }

    pub fn featured() -> Self {
        Self {
            featured_only: true,
            ..Self::default()
        }
    }

    pub fn search(query: impl Into<String>) -> Self {
        Self {
            search: Some(query.into()),
            ..Self::default()
        }
    }
}
