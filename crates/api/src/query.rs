//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Cursor pagination parameters (`?lastId=&limit=`).
///
/// The cursor is kept as a string here and validated by
/// `inotebook_core::pagination::parse_cursor`, so a malformed cursor reports a
/// validation error instead of a generic query rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CursorParams {
    #[serde(alias = "lastId")]
    pub last_id: Option<String>,
    pub limit: Option<i64>,
}

/// `fetchNextNote` parameters: cursor plus an optional category filter.
#[derive(Debug, Default, Deserialize)]
pub struct NextNoteParams {
    #[serde(alias = "lastId")]
    pub last_id: Option<String>,
    #[serde(alias = "categoryId")]
    pub category_id: Option<String>,
    pub limit: Option<i64>,
}

/// Free-text search with cursor pagination.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    #[serde(alias = "lastId")]
    pub last_id: Option<String>,
    pub limit: Option<i64>,
}

/// Plain `?limit=` parameter.
#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}
