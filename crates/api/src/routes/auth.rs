//! Route definitions for the `/auth` resource.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /createuser  -> create_user
/// POST /login       -> login
/// POST /google      -> google_login
/// POST /getuser     -> get_user (requires auth)
/// PUT  /profile     -> update_profile (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/createuser", post(auth::create_user))
        .route("/login", post(auth::login))
        .route("/google", post(auth::google_login))
        .route("/getuser", post(auth::get_user))
        .route("/profile", put(auth::update_profile))
}
