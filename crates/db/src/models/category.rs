//! Category entity model and DTOs.

use inotebook_core::category_tree::TreeItem;
use inotebook_core::types::{DbId, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub parent_id: Option<DbId>,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TreeItem for Category {
    fn id(&self) -> DbId {
        self.id
    }

    fn parent_id(&self) -> Option<DbId> {
        self.parent_id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A category with its parent's name resolved.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryDetail {
    pub id: DbId,
    pub name: String,
    pub parent_id: Option<DbId>,
    pub parent_name: Option<String>,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    #[serde(alias = "parent")]
    pub parent_id: Option<DbId>,
    pub description: Option<String>,
}

/// DTO for updating a category. All fields are optional.
///
/// `parent_id` distinguishes "absent" (`None`) from an explicit `null`
/// (`Some(None)`, detach to root).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    #[serde(default, alias = "parent", deserialize_with = "deserialize_some")]
    pub parent_id: Option<Option<DbId>>,
    pub description: Option<String>,
}

impl UpdateCategory {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.parent_id.is_none() && self.description.is_none()
    }
}

fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
