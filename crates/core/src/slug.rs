//! URL slug generation for notes.
//!
//! A slug is derived from the note title once, at creation, and never
//! regenerated. Uniqueness is enforced by the `uq_notes_slug` constraint;
//! the helpers here only produce the candidate sequence
//! `base`, `base-2`, `base-3`, ...

/// Number of full probe-and-insert passes before a slug collision is
/// reported as a conflict.
pub const MAX_SLUG_ATTEMPTS: u32 = 2;

/// Prefix for slugs of titles that normalize to nothing.
pub const FALLBACK_SLUG_PREFIX: &str = "note";

/// Normalize a title into a slug base.
///
/// Whitespace, hyphens, and underscores become separators. Any other
/// character outside `[a-z0-9]` (after lowercasing) is dropped, so
/// "Don't Stop!" becomes `dont-stop`. Returns `None` when nothing survives.
pub fn base_slug(title: &str) -> Option<String> {
    let mut out = String::with_capacity(title.len());
    let mut pending_separator = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !out.is_empty() {
                out.push('-');
            }
            pending_separator = false;
            out.push(c);
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_separator = true;
        }
    }

    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Slug base for `title`, falling back to `note-<now_millis>`.
pub fn base_slug_or_fallback(title: &str, now_millis: i64) -> String {
    base_slug(title).unwrap_or_else(|| format!("{FALLBACK_SLUG_PREFIX}-{now_millis}"))
}

/// The `attempt`-th candidate for `base`. Attempt 1 is the bare base.
pub fn slug_candidate(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{base}-{attempt}")
    }
}

/// Whether `s` is a well-formed slug: non-empty `[a-z0-9-]`, no leading,
/// trailing, or doubled hyphens.
pub fn is_valid_slug(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('-')
        && !s.ends_with('-')
        && !s.contains("--")
        && s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}
