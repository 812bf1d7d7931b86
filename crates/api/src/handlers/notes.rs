//! Handlers for the `/notes` resource.
//!
//! Writes go through the owner-or-admin guard; reads are public except the
//! personal `fetchallnotes` listing. Cursor listings return the page object
//! (`items`, `has_more`, `next_cursor`) at the top level.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use inotebook_core::category_tree::AncestorEntry;
use inotebook_core::error::CoreError;
use inotebook_core::note::{
    normalize_tag, read_time_minutes, validate_description, validate_search_query,
    validate_title, DEFAULT_FEATURED_LIMIT, DEFAULT_RECENT_LIMIT,
};
use inotebook_core::pagination::{
    clamp_limit, parse_cursor, CursorPage, DEFAULT_FEATURED_BATCH_LIMIT, DEFAULT_PAGE_LIMIT,
    DEFAULT_SEARCH_LIMIT,
};
use inotebook_core::roles::ensure_owner_or_admin;
use inotebook_core::types::DbId;
use inotebook_db::models::note::{CreateNote, Note, NoteFilter, NoteTitle, NoteView, UpdateNote};
use inotebook_db::repositories::{CategoryRepo, NoteRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::query::{CursorParams, LimitParams, NextNoteParams, SearchParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /notes/addnote`.
#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    pub description: String,
    pub tag: Option<String>,
    #[serde(alias = "categoryId", alias = "category")]
    pub category_id: DbId,
    #[serde(default, alias = "isFeatured")]
    pub is_featured: Option<bool>,
}

/// Request body for `PUT /notes/updatenote/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tag: Option<String>,
    #[serde(alias = "categoryId", alias = "category")]
    pub category_id: Option<DbId>,
    #[serde(alias = "isFeatured")]
    pub is_featured: Option<bool>,
}

impl UpdateNoteRequest {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.tag.is_none()
            && self.category_id.is_none()
            && self.is_featured.is_none()
    }
}

/// A note together with its category's root-first path.
#[derive(Debug, Serialize)]
pub struct NoteWithPath {
    #[serde(flatten)]
    pub note: NoteView,
    pub ancestor_path: Vec<AncestorEntry>,
}

#[derive(Debug, Serialize)]
pub struct CategoryRef {
    pub id: DbId,
    pub name: String,
}

/// A cursor page scoped to one category.
#[derive(Debug, Serialize)]
pub struct CategoryNotesPage {
    pub category: CategoryRef,
    #[serde(flatten)]
    pub page: CursorPage<NoteView>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn note_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Note", id })
}

fn category_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Category",
        id,
    })
}

async fn ensure_category(state: &AppState, category_id: DbId) -> AppResult<()> {
    if CategoryRepo::exists(&state.pool, category_id).await? {
        Ok(())
    } else {
        Err(category_not_found(category_id))
    }
}

/// The featured flag a caller may actually set. Non-admins are ignored.
fn permitted_featured(auth: &AuthUser, requested: Option<bool>) -> Option<bool> {
    match requested {
        Some(flag) if !auth.is_admin() => {
            tracing::warn!(
                user_id = auth.user_id,
                requested = flag,
                "Ignoring isFeatured from non-admin"
            );
            None
        }
        other => other,
    }
}

/// Load a note and apply the owner-or-admin check. Missing notes are 404
/// before any permission decision.
async fn load_owned_note(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<Note> {
    let note = NoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| note_not_found(id))?;
    ensure_owner_or_admin(auth.user_id, auth.role, note.user_id)?;
    Ok(note)
}

async fn fetch_view(state: &AppState, id: DbId) -> AppResult<NoteView> {
    NoteRepo::find_view(&state.pool, id)
        .await?
        .ok_or_else(|| note_not_found(id))
}

/// Parse an optional numeric query value; blank means absent.
fn parse_optional_id(raw: Option<&str>, field: &str) -> AppResult<Option<DbId>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s.parse::<DbId>().map(Some).map_err(|_| {
            AppError::Core(CoreError::Validation(format!(
                "{field} must be a numeric id"
            )))
        }),
    }
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// POST /api/v1/notes/addnote
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Json(input): Json<CreateNoteRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<NoteView>>)> {
    let title = validate_title(&input.title)?;
    validate_description(&input.description)?;
    ensure_category(&state, input.category_id).await?;

    let is_featured = permitted_featured(&auth, input.is_featured).unwrap_or(false);

    let note = NoteRepo::create(
        &state.pool,
        &CreateNote {
            user_id: auth.user_id,
            category_id: input.category_id,
            title,
            read_time_minutes: read_time_minutes(&input.description),
            description: input.description,
            tag: normalize_tag(input.tag.as_deref()),
            is_featured,
        },
    )
    .await?;

    tracing::info!(
        note_id = note.id,
        user_id = auth.user_id,
        slug = %note.slug,
        "Note created"
    );
    let view = fetch_view(&state, note.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// PUT /api/v1/notes/updatenote/{id}
///
/// The slug is kept as-is even when the title changes.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateNoteRequest>,
) -> AppResult<Json<DataResponse<NoteView>>> {
    if input.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "No update fields provided".into(),
        )));
    }

    let title = input.title.as_deref().map(validate_title).transpose()?;
    if let Some(description) = input.description.as_deref() {
        validate_description(description)?;
    }

    load_owned_note(&state, &auth, id).await?;

    if let Some(category_id) = input.category_id {
        ensure_category(&state, category_id).await?;
    }

    let changes = UpdateNote {
        title,
        read_time_minutes: input.description.as_deref().map(read_time_minutes),
        description: input.description,
        tag: input.tag.as_deref().map(|t| normalize_tag(Some(t))),
        category_id: input.category_id,
        is_featured: permitted_featured(&auth, input.is_featured),
    };

    NoteRepo::update(&state.pool, id, &changes)
        .await?
        .ok_or_else(|| note_not_found(id))?;

    tracing::info!(note_id = id, user_id = auth.user_id, "Note updated");
    let view = fetch_view(&state, id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/notes/deletenote/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Note>>> {
    load_owned_note(&state, &auth, id).await?;

    let deleted = NoteRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| note_not_found(id))?;

    tracing::info!(note_id = id, user_id = auth.user_id, "Note deleted");
    Ok(Json(DataResponse { data: deleted }))
}

// ---------------------------------------------------------------------------
// Single-note reads
// ---------------------------------------------------------------------------

/// GET /api/v1/notes/fetchNotesIrrespective/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<NoteView>>> {
    let view = fetch_view(&state, id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// GET /api/v1/notes/fetchNoteBySlug/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<NoteWithPath>>> {
    let note = NoteRepo::find_view_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Note with slug '{slug}' not found")))?;

    let ancestor_path = CategoryRepo::ancestor_path(&state.pool, note.category_id).await?;
    Ok(Json(DataResponse {
        data: NoteWithPath {
            note,
            ancestor_path,
        },
    }))
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// GET /api/v1/notes/fetchallnotes
///
/// Admins see every note; everyone else sees their own.
pub async fn list_mine(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<NoteView>>>> {
    let notes = if auth.is_admin() {
        NoteRepo::list_all_views(&state.pool).await?
    } else {
        NoteRepo::list_views_for_user(&state.pool, auth.user_id).await?
    };
    Ok(Json(DataResponse { data: notes }))
}

/// GET /api/v1/notes/fetchNextNote?lastId&categoryId&limit
///
/// A category filter naming a missing category yields an empty page.
pub async fn next_page(
    State(state): State<AppState>,
    Query(params): Query<NextNoteParams>,
) -> AppResult<Json<CursorPage<NoteView>>> {
    let cursor = parse_cursor(params.last_id.as_deref())?;
    let category_id = parse_optional_id(params.category_id.as_deref(), "categoryId")?;
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT);

    let filter = match category_id {
        Some(id) => {
            if !CategoryRepo::exists(&state.pool, id).await? {
                return Ok(Json(CursorPage::empty()));
            }
            NoteFilter::category(id)
        }
        None => NoteFilter::default(),
    };

    let page = NoteRepo::list_page(&state.pool, &filter, cursor, limit).await?;
    Ok(Json(page))
}

/// GET /api/v1/notes/featured?limit
pub async fn featured(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<NoteView>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_FEATURED_LIMIT);
    let notes = NoteRepo::list_featured(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: notes }))
}

/// GET /api/v1/notes/featured/batch?lastId&limit
pub async fn featured_batch(
    State(state): State<AppState>,
    Query(params): Query<CursorParams>,
) -> AppResult<Json<CursorPage<NoteView>>> {
    let cursor = parse_cursor(params.last_id.as_deref())?;
    let limit = clamp_limit(params.limit, DEFAULT_FEATURED_BATCH_LIMIT);
    let page = NoteRepo::list_page(&state.pool, &NoteFilter::featured(), cursor, limit).await?;
    Ok(Json(page))
}

/// GET /api/v1/notes/search?query&lastId&limit
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<CursorPage<NoteView>>> {
    let query = validate_search_query(params.query.as_deref())?;
    let cursor = parse_cursor(params.last_id.as_deref())?;
    let limit = clamp_limit(params.limit, DEFAULT_SEARCH_LIMIT);

    let page = NoteRepo::list_page(&state.pool, &NoteFilter::search(query), cursor, limit).await?;
    Ok(Json(page))
}

/// GET /api/v1/notes/recent?limit
pub async fn recent(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<NoteView>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_RECENT_LIMIT);
    let notes = NoteRepo::list_recent(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: notes }))
}

/// GET /api/v1/notes/by-category/{id}?lastId&limit
pub async fn by_category(
    State(state): State<AppState>,
    Path(category_id): Path<DbId>,
    Query(params): Query<CursorParams>,
) -> AppResult<Json<CategoryNotesPage>> {
    let category = CategoryRepo::find_by_id(&state.pool, category_id)
        .await?
        .ok_or_else(|| category_not_found(category_id))?;

    let cursor = parse_cursor(params.last_id.as_deref())?;
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT);
    let page =
        NoteRepo::list_page(&state.pool, &NoteFilter::category(category_id), cursor, limit)
            .await?;

    Ok(Json(CategoryNotesPage {
        category: CategoryRef {
            id: category.id,
            name: category.name,
        },
        page,
    }))
}

/// GET /api/v1/notes/by-category/{id}/titles
pub async fn titles_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<NoteTitle>>>> {
    ensure_category(&state, category_id).await?;
    let titles = NoteRepo::titles_for_category(&state.pool, category_id).await?;
    Ok(Json(DataResponse { data: titles }))
}
