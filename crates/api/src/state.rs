use std::sync::Arc;

use crate::auth::google::IdentityVerifier;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: inotebook_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Google ID token verifier. `None` when Google sign-in is not configured.
    pub identity: Option<Arc<dyn IdentityVerifier>>,
}
