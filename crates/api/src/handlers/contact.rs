//! Handlers for the `/contact` resource.
//!
//! Submissions are only stored here; the hourly digest in `inotebook_notify`
//! emails them to SuperAdmins.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use inotebook_core::contact::{validate_submission, ContactStatus};
use inotebook_core::error::CoreError;
use inotebook_core::types::DbId;
use inotebook_db::models::contact_request::{ContactRequest, CreateContactRequest};
use inotebook_db::repositories::ContactRequestRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireSuperAdmin;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Request body for `POST /contact/submit`.
#[derive(Debug, Deserialize)]
pub struct SubmitContactRequest {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: String,
}

/// Request body for `PUT /contact/requests/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// POST /api/v1/contact/submit
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<SubmitContactRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let submission = validate_submission(
        &input.name,
        &input.email,
        input.company.as_deref(),
        &input.message,
    )?;

    let request =
        ContactRequestRepo::create(&state.pool, &CreateContactRequest::from(submission)).await?;

    tracing::info!(contact_request_id = request.id, "Contact request received");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "Thank you for reaching out. We will get back to you soon.",
        )),
    ))
}

/// GET /api/v1/contact/requests
pub async fn list(
    State(state): State<AppState>,
    RequireSuperAdmin(_admin): RequireSuperAdmin,
) -> AppResult<Json<DataResponse<Vec<ContactRequest>>>> {
    let requests = ContactRequestRepo::list_newest_first(&state.pool).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// PUT /api/v1/contact/requests/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<DataResponse<ContactRequest>>> {
    let status: ContactStatus = input.status.parse()?;

    let request = ContactRequestRepo::update_status(&state.pool, id, status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ContactRequest",
            id,
        }))?;

    tracing::info!(
        contact_request_id = id,
        status = %status,
        user_id = admin.user_id,
        "Contact request status changed"
    );
    Ok(Json(DataResponse { data: request }))
}
