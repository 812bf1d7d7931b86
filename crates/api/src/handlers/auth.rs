//! Handlers for the `/auth` resource (sign-up, login, Google sign-in, profile).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use inotebook_core::error::CoreError;
use inotebook_core::user::{
    normalize_about, normalize_email, validate_city, validate_country, validate_name,
    validate_profile_changes,
};
use inotebook_db::models::user::{CreateUser, User, UserResponse};
use inotebook_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::google::GoogleIdentity;
use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/createuser`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub country: String,
    pub city: String,
    pub about: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/google`.
#[derive(Debug, Deserialize)]
pub struct GoogleLoginRequest {
    #[serde(alias = "idToken", alias = "credential")]
    pub id_token: String,
}

/// Request body for `PUT /auth/profile`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub about: Option<String>,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/createuser
///
/// Register a local account. A duplicate email is rejected by
/// `uq_users_email` and surfaces as 409.
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let name = validate_name(&input.name)?;
    let email = normalize_email(&input.email)?;
    validate_password_strength(&input.password, state.config.password_min_length)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let country = validate_country(&input.country)?;
    let city = validate_city(&input.city)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name,
            email,
            password_hash: Some(password_hash),
            country: Some(country),
            city: Some(city),
            about: normalize_about(input.about.as_deref()),
            google_id: None,
            profile_picture_url: None,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");
    Ok((StatusCode::CREATED, Json(auth_response(&state, user)?)))
}

/// POST /api/v1/auth/login
///
/// Unknown email, wrong password, and password-less (Google-only) accounts
/// all get the same 401.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = normalize_email(&input.email)?;

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid_credentials)?;

    let Some(hash) = user.password_hash.as_deref() else {
        tracing::debug!(user_id = user.id, "Password login attempted on Google-only account");
        return Err(invalid_credentials());
    };

    let password_valid = verify_password(&input.password, hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid_credentials());
    }

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(auth_response(&state, user)?))
}

/// POST /api/v1/auth/google
///
/// Resolve the verified Google identity to a user: by Google id first, then by
/// email (linking the Google id), else create a password-less account.
pub async fn google_login(
    State(state): State<AppState>,
    Json(input): Json<GoogleLoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let verifier = state.identity.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("Google sign-in is not configured".into())
    })?;

    let identity = verifier.verify(&input.id_token).await?;
    let user = resolve_google_user(&state, &identity).await?;

    tracing::info!(user_id = user.id, "User signed in with Google");
    Ok(Json(auth_response(&state, user)?))
}

/// POST /api/v1/auth/getuser
pub async fn get_user(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PUT /api/v1/auth/profile
///
/// Only name, country, city, and about are writable here.
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let changes = validate_profile_changes(
        input.name.as_deref(),
        input.country.as_deref(),
        input.city.as_deref(),
        input.about.as_deref(),
    )?;

    let user = UserRepo::update_profile(&state.pool, auth.user_id, &changes)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    tracing::info!(user_id = user.id, "Profile updated");
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into()))
}

/// Issue an access token for `user` and build the response.
fn auth_response(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let role = user.role()?;
    let access_token = generate_access_token(user.id, role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthResponse {
        access_token,
        expires_in: state.config.jwt.expires_in_secs(),
        user: UserResponse::from(user),
    })
}

async fn resolve_google_user(state: &AppState, identity: &GoogleIdentity) -> AppResult<User> {
    if let Some(user) = UserRepo::find_by_google_id(&state.pool, &identity.subject).await? {
        return Ok(user);
    }

    let email = normalize_email(&identity.email)?;

    if let Some(existing) = UserRepo::find_by_email(&state.pool, &email).await? {
        let linked = UserRepo::link_google(
            &state.pool,
            existing.id,
            &identity.subject,
            identity.picture.as_deref(),
        )
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: existing.id,
        }))?;
        tracing::info!(user_id = linked.id, "Linked Google account to existing user");
        return Ok(linked);
    }

    let name = identity
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name,
            email,
            password_hash: None,
            country: None,
            city: None,
            about: normalize_about(None),
            google_id: Some(identity.subject.clone()),
            profile_picture_url: identity.picture.clone(),
        },
    )
    .await?;
    tracing::info!(user_id = user.id, "Created user from Google sign-in");
    Ok(user)
}
