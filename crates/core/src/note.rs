//! Note field rules and derived values.

use crate::error::CoreError;

pub const DEFAULT_TAG: &str = "General";
pub const WORDS_PER_MINUTE: usize = 200;
pub const TITLE_MIN_LEN: usize = 3;
pub const DESCRIPTION_MIN_LEN: usize = 5;
pub const SEARCH_QUERY_MAX_LEN: usize = 100;

/// Default `limit` for the featured listing.
pub const DEFAULT_FEATURED_LIMIT: i64 = 3;

/// Default `limit` for the recent listing.
pub const DEFAULT_RECENT_LIMIT: i64 = 5;

/// Estimated reading time: one minute per 200 words, rounded up, at least 1.
pub fn read_time_minutes(description: &str) -> i32 {
    let words = description.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    i32::try_from(minutes).unwrap_or(i32::MAX)
}

/// Trim and check a title. Returns the trimmed title.
pub fn validate_title(title: &str) -> Result<String, CoreError> {
    let trimmed = title.trim();
    if trimmed.chars().count() < TITLE_MIN_LEN {
        return Err(CoreError::Validation(format!(
            "title must be at least {TITLE_MIN_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.trim().chars().count() < DESCRIPTION_MIN_LEN {
        return Err(CoreError::Validation(format!(
            "description must be at least {DESCRIPTION_MIN_LEN} characters"
        )));
    }
    Ok(())
}

/// Trimmed tag, or [`DEFAULT_TAG`] when missing or blank.
pub fn normalize_tag(tag: Option<&str>) -> String {
    match tag.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => DEFAULT_TAG.to_string(),
    }
}

/// Trim and check a free-text search query.
pub fn validate_search_query(query: Option<&str>) -> Result<String, CoreError> {
    let trimmed = query.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("query must not be empty".into()));
    }
    if trimmed.chars().count() > SEARCH_QUERY_MAX_LEN {
        return Err(CoreError::Validation(format!(
            "query must be at most {SEARCH_QUERY_MAX_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}
