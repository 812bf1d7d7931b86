use inotebook_core::error::CoreError;

/// Failure of a repository operation that also enforces a domain rule.
///
/// Plain CRUD methods return `sqlx::Error` directly; this type is only used
/// where a query loop can also trip a [`CoreError`] (ancestor walks, slug
/// retries).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Domain(#[from] CoreError),
}
