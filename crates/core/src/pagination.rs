//! Keyset pagination over insertion-ordered ids.
//!
//! Pages are ordered by `id DESC`. A cursor is the id of the last item of the
//! previous page, and the next page holds ids strictly below it. Cursors
//! travel as strings on the query (`lastId`) and in responses (`next_cursor`).

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Default page size for general note listings.
pub const DEFAULT_PAGE_LIMIT: i64 = 9;

/// Default page size for the featured batch listing.
pub const DEFAULT_FEATURED_BATCH_LIMIT: i64 = 5;

/// Default page size for search results.
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Hard upper bound on any page size.
pub const MAX_PAGE_LIMIT: i64 = 50;

/// Parse an optional cursor. Blank input is treated as "first page".
pub fn parse_cursor(raw: Option<&str>) -> Result<Option<DbId>, CoreError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<DbId>() {
        Ok(id) if id > 0 => Ok(Some(id)),
        _ => Err(CoreError::Validation(format!("Invalid cursor '{raw}'"))),
    }
}

/// Clamp a requested limit into `1..=MAX_PAGE_LIMIT`, using `default` when
/// absent.
pub fn clamp_limit(limit: Option<i64>, default: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, MAX_PAGE_LIMIT)
}

/// One page of a cursor listing.
#[derive(Debug, Clone, Serialize)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

impl<T> CursorPage<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            has_more: false,
            next_cursor: None,
        }
    }

    /// Build a page. `last_id` is the id of the final item, if any;
    /// `has_more` must come from an existence probe below it.
    pub fn new(items: Vec<T>, last_id: Option<DbId>, has_more: bool) -> Self {
        Self {
            has_more: has_more && last_id.is_some(),
            next_cursor: next_cursor(last_id),
            items,
        }
    }
}

/// Render a cursor for the response.
pub fn next_cursor(last_id: Option<DbId>) -> Option<String> {
    last_id.map(|id| id.to_string())
}
