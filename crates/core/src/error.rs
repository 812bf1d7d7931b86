use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A category parent chain loops back on itself or exceeds the depth bound.
    #[error("Category hierarchy cycle detected at category {id}")]
    CategoryCycle { id: DbId },

    #[error("Internal error: {0}")]
    Internal(String),
}
