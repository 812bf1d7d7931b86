//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role ranks
//! below the extractor's minimum. Identity is checked first, so a missing or
//! bad token is always 401 before any 403.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use inotebook_core::roles::{require_rank, Role};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn extract_with_rank(
    parts: &mut Parts,
    state: &AppState,
    min: Role,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    require_rank(user.role, min)?;
    Ok(user)
}

/// Requires `admin` or higher (SuperAdmin passes). Rejects with 403 otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        extract_with_rank(parts, state, Role::Admin)
            .await
            .map(RequireAdmin)
    }
}

/// Requires `SuperAdmin`.
pub struct RequireSuperAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireSuperAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        extract_with_rank(parts, state, Role::SuperAdmin)
            .await
            .map(RequireSuperAdmin)
    }
}

/// Requires any authenticated user.
///
/// Functionally equivalent to [`AuthUser`] but named for route handlers where
/// "this route requires authentication" should read explicitly.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        extract_with_rank(parts, state, Role::User)
            .await
            .map(RequireAuth)
    }
}
