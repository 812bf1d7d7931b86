//! Handlers for the `/categories` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use inotebook_core::category_tree::{
    build_tree, validate_category_description, validate_category_name, validate_not_self_parent,
    would_create_cycle, AncestorEntry, TreeNode,
};
use inotebook_core::error::CoreError;
use inotebook_core::types::DbId;
use inotebook_db::models::category::{Category, CategoryDetail, CreateCategory, UpdateCategory};
use inotebook_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Category",
        id,
    })
}

/// Fail with 404 unless category `id` exists.
async fn ensure_exists(state: &AppState, id: DbId) -> AppResult<()> {
    if CategoryRepo::exists(&state.pool, id).await? {
        Ok(())
    } else {
        Err(not_found(id))
    }
}

/// POST /api/v1/categories
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    let name = validate_category_name(&input.name)?;
    if let Some(description) = input.description.as_deref() {
        validate_category_description(description)?;
    }
    if let Some(parent_id) = input.parent_id {
        ensure_exists(&state, parent_id).await?;
    }

    let category = CategoryRepo::create(
        &state.pool,
        &name,
        input.parent_id,
        input.description.as_deref(),
    )
    .await?;

    tracing::info!(
        category_id = category.id,
        parent_id = ?category.parent_id,
        user_id = admin.user_id,
        "Category created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// GET /api/v1/categories
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let categories = CategoryRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/categories/tree
pub async fn tree(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<TreeNode<Category>>>>> {
    let categories = CategoryRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse {
        data: build_tree(categories),
    }))
}

/// GET /api/v1/categories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CategoryDetail>>> {
    let category = CategoryRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: category }))
}

/// GET /api/v1/categories/{id}/ancestors
pub async fn ancestors(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AncestorEntry>>>> {
    ensure_exists(&state, id).await?;
    let path = CategoryRepo::ancestor_path(&state.pool, id).await?;
    Ok(Json(DataResponse { data: path }))
}

/// PUT /api/v1/categories/{id}
///
/// Field validation runs before any lookup. A new parent must exist and must
/// not sit below this category; deeper loops are rejected before writing.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<Json<DataResponse<Category>>> {
    if input.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "No update fields provided".into(),
        )));
    }

    let name = input
        .name
        .as_deref()
        .map(validate_category_name)
        .transpose()?;
    if let Some(description) = input.description.as_deref() {
        validate_category_description(description)?;
    }
    if let Some(parent_id) = input.parent_id {
        validate_not_self_parent(id, parent_id)?;
    }

    ensure_exists(&state, id).await?;

    if let Some(Some(parent_id)) = input.parent_id {
        ensure_exists(&state, parent_id).await?;

        let parent_path = CategoryRepo::ancestor_path(&state.pool, parent_id).await?;
        if would_create_cycle(id, &parent_path) {
            return Err(AppError::Core(CoreError::Validation(
                "parent would create a cycle in the category hierarchy".into(),
            )));
        }
    }

    let category = CategoryRepo::update(
        &state.pool,
        id,
        name.as_deref(),
        input.parent_id,
        input.description.as_deref(),
    )
    .await?
    .ok_or_else(|| not_found(id))?;

    tracing::info!(category_id = id, user_id = admin.user_id, "Category updated");
    Ok(Json(DataResponse { data: category }))
}
