pub mod auth;
pub mod categories;
pub mod contact;
pub mod health;
pub mod notes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/createuser                        sign up (public)
/// /auth/login                             password login (public)
/// /auth/google                            Google sign-in (public)
/// /auth/getuser                           current user (auth)
/// /auth/profile                           profile update (auth)
///
/// /notes/...                              see routes::notes
///
/// /categories                             list (public), create (admin)
/// /categories/tree                        nested tree (public)
/// /categories/{id}                        get (public), update (admin)
/// /categories/{id}/ancestors              root-first path (public)
///
/// /contact/submit                         submit (public)
/// /contact/requests                       inbox (SuperAdmin)
/// /contact/requests/{id}/status           change status (SuperAdmin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/notes", notes::router())
        .nest("/categories", categories::router())
        .nest("/contact", contact::router())
}
