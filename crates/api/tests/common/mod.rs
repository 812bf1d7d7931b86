#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use inotebook_api::auth::google::{GoogleIdentity, IdentityVerifier};
use inotebook_api::auth::jwt::{generate_access_token, JwtConfig};
use inotebook_api::auth::password::hash_password;
use inotebook_api::config::ServerConfig;
use inotebook_api::router::build_app_router;
use inotebook_api::state::AppState;
use inotebook_core::error::CoreError;
use inotebook_core::roles::Role;
use inotebook_core::types::DbId;
use inotebook_db::models::category::Category;
use inotebook_db::models::note::{CreateNote, Note};
use inotebook_db::models::user::{CreateUser, User};
use inotebook_db::repositories::{CategoryRepo, NoteRepo, UserRepo};

pub const TEST_PASSWORD: &str = "password123";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        password_min_length: 5,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 60,
        },
        google: None,
    }
}

/// Full application router with Google sign-in disabled.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_identity(pool, None)
}

/// Full application router using the given identity verifier.
pub fn build_test_app_with_identity(
    pool: PgPool,
    identity: Option<Arc<dyn IdentityVerifier>>,
) -> Router {
    build_app_router(AppState {
        pool,
        config: Arc::new(test_config()),
        identity,
    })
}

// ---------------------------------------------------------------------------
// Fake Google verifier
// ---------------------------------------------------------------------------

/// Accepts exactly one token and returns a fixed identity for it.
pub struct FakeVerifier {
    pub token: String,
    pub identity: GoogleIdentity,
}

#[async_trait]
impl IdentityVerifier for FakeVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, CoreError> {
        if id_token == self.token {
            Ok(self.identity.clone())
        } else {
            Err(CoreError::Unauthorized("Invalid Google token".into()))
        }
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, path: &str) -> Response<Body> {
    send(app, Method::GET, path, None, None).await
}

pub async fn get_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, path, Some(token), None).await
}

pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, path, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, path, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, path, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, path, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, path, Some(token), None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Insert a local user with [`TEST_PASSWORD`] and the given role, returning
/// the row and a valid access token.
pub async fn seed_user(pool: &PgPool, name: &str, role: Role) -> (User, String) {
    let email = format!("{}@example.com", name.to_lowercase());
    let input = CreateUser {
        name: name.to_string(),
        email,
        password_hash: Some(hash_password(TEST_PASSWORD).unwrap()),
        country: Some("India".to_string()),
        city: Some("Pune".to_string()),
        about: "about is empty".to_string(),
        google_id: None,
        profile_picture_url: None,
    };
    let mut user = UserRepo::create(pool, &input).await.unwrap();
    if role != Role::User {
        assert!(UserRepo::set_role(pool, user.id, role).await.unwrap());
        user.role = role.as_str().to_string();
    }
    let token = token_for(user.id, role);
    (user, token)
}

pub fn token_for(user_id: DbId, role: Role) -> String {
    generate_access_token(user_id, role, &test_config().jwt).unwrap()
}

pub async fn seed_category(pool: &PgPool, name: &str, parent_id: Option<DbId>) -> Category {
    CategoryRepo::create(pool, name, parent_id, None)
        .await
        .unwrap()
}

pub async fn seed_note(pool: &PgPool, user_id: DbId, category_id: DbId, title: &str) -> Note {
    NoteRepo::create(
        pool,
        &CreateNote {
            user_id,
            category_id,
            title: title.to_string(),
            description: "A short body for testing".to_string(),
            tag: "General".to_string(),
            read_time_minutes: 1,
            is_featured: false,
        },
    )
    .await
    .unwrap()
}
