//! Repository for the `categories` table.
//!
//! Categories form a forest through `parent_id`. Tree assembly and the
//! ancestor walk's cycle guard live in `inotebook_core::category_tree`;
//! this module only feeds them rows.

use inotebook_core::category_tree::{AncestorEntry, AncestorWalk};
use inotebook_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoError;
use crate::models::category::{Category, CategoryDetail};

/// Column list for `categories` queries.
const COLUMNS: &str = "id, name, parent_id, description, created_at, updated_at";

/// Provides CRUD and hierarchy lookups for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a category. A sibling with the same name fails on
    /// `uq_categories_parent_name`.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        parent_id: Option<DbId>,
        description: Option<&str>,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, parent_id, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .bind(parent_id)
            .bind(description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a category with its parent's name resolved.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CategoryDetail>, sqlx::Error> {
        sqlx::query_as::<_, CategoryDetail>(
            "SELECT c.id, c.name, c.parent_id, p.name AS parent_name, c.description, \
                    c.created_at, c.updated_at \
             FROM categories c \
             LEFT JOIN categories p ON p.id = c.parent_id \
             WHERE c.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Flat listing ordered by parent (roots first), then name.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories ORDER BY parent_id NULLS FIRST, name, id"
        );
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Patch a category. `parent_id` of `Some(None)` detaches it to the root.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        name: Option<&str>,
        parent_id: Option<Option<DbId>>,
        description: Option<&str>,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                name = COALESCE($2, name),
                parent_id = CASE WHEN $3 THEN $4 ELSE parent_id END,
                description = COALESCE($5, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(name)
            .bind(parent_id.is_some())
            .bind(parent_id.flatten())
            .bind(description)
            .fetch_optional(pool)
            .await
    }

    /// Root-first path from the top of the hierarchy down to `id`, inclusive.
    ///
    /// A dangling parent reference truncates the path. A loop or an
    /// over-deep chain fails with `CoreError::CategoryCycle`.
    pub async fn ancestor_path(pool: &PgPool, id: DbId) -> Result<Vec<AncestorEntry>, RepoError> {
        let mut walk = AncestorWalk::new(id);
        while let Some(current) = walk.next_id() {
            let row = sqlx::query_as::<_, (DbId, String, Option<DbId>)>(
                "SELECT id, name, parent_id FROM categories WHERE id = $1",
            )
            .bind(current)
            .fetch_optional(pool)
            .await?;

            match row {
                Some((id, name, parent_id)) => walk.visit(id, name, parent_id)?,
                None => {
                    tracing::debug!(category_id = current, "Ancestor walk hit missing category");
                    walk.truncate();
                }
            }
        }
        Ok(walk.finish())
    }
}
