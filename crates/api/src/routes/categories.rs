//! Route definitions for the `/categories` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Routes mounted at `/categories`.
///
/// ```text
/// GET  /                  -> list
/// POST /                  -> create (admin)
/// GET  /tree              -> tree
/// GET  /{id}              -> get_by_id
/// PUT  /{id}              -> update (admin)
/// GET  /{id}/ancestors    -> ancestors
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::list).post(categories::create))
        .route("/tree", get(categories::tree))
        .route(
            "/{id}",
            get(categories::get_by_id).put(categories::update),
        )
        .route("/{id}/ancestors", get(categories::ancestors))
}
