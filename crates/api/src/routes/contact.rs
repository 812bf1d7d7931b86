//! Route definitions for the `/contact` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::contact;
use crate::state::AppState;

/// Routes mounted at `/contact`.
///
/// ```text
/// POST /submit                   -> submit
/// GET  /requests                 -> list (SuperAdmin)
/// PUT  /requests/{id}/status     -> update_status (SuperAdmin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/submit", post(contact::submit))
        .route("/requests", get(contact::list))
        .route("/requests/{id}/status", put(contact::update_status))
}
