//! Route definitions for the `/notes` resource.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::notes;
use crate::state::AppState;

/// Routes mounted at `/notes`.
///
/// ```text
/// POST   /addnote                       -> create (auth)
/// PUT    /updatenote/{id}               -> update (owner or admin)
/// DELETE /deletenote/{id}               -> delete (owner or admin)
/// GET    /fetchallnotes                 -> list_mine (auth)
/// GET    /fetchNotesIrrespective/{id}   -> get_by_id
/// GET    /fetchNoteBySlug/{slug}        -> get_by_slug
/// GET    /fetchNextNote                 -> next_page
/// GET    /featured                      -> featured
/// GET    /featured/batch                -> featured_batch
/// GET    /search                        -> search
/// GET    /recent                        -> recent
/// GET    /by-category/{id}              -> by_category
/// GET    /by-category/{id}/titles       -> titles_by_category
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/addnote", post(notes::create))
        .route("/updatenote/{id}", put(notes::update))
        .route("/deletenote/{id}", delete(notes::delete))
        .route("/fetchallnotes", get(notes::list_mine))
        .route("/fetchNotesIrrespective/{id}", get(notes::get_by_id))
        .route("/fetchNoteBySlug/{slug}", get(notes::get_by_slug))
        .route("/fetchNextNote", get(notes::next_page))
        .route("/featured", get(notes::featured))
        .route("/featured/batch", get(notes::featured_batch))
        .route("/search", get(notes::search))
        .route("/recent", get(notes::recent))
        .route("/by-category/{id}", get(notes::by_category))
        .route("/by-category/{id}/titles", get(notes::titles_by_category))
}
