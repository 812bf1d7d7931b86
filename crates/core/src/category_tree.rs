//! Category hierarchy: field validation, in-memory tree assembly, and the
//! bounded ancestor walk.
//!
//! The tree is built from one flat fetch in two passes. The ancestor walk is
//! driven by the caller (one lookup per step) through [`AncestorWalk`], which
//! owns the visited set and depth bound so a corrupted parent chain ends in
//! [`CoreError::CategoryCycle`] instead of looping.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

pub const CATEGORY_NAME_MIN_LEN: usize = 2;
pub const CATEGORY_NAME_MAX_LEN: usize = 50;
pub const CATEGORY_DESCRIPTION_MAX_LEN: usize = 200;

/// Upper bound on parent links followed by a single ancestor walk.
pub const MAX_CATEGORY_DEPTH: usize = 32;

/// Trim and length-check a category name. Returns the trimmed name.
pub fn validate_category_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if !(CATEGORY_NAME_MIN_LEN..=CATEGORY_NAME_MAX_LEN).contains(&len) {
        return Err(CoreError::Validation(format!(
            "name must be {CATEGORY_NAME_MIN_LEN}-{CATEGORY_NAME_MAX_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

pub fn validate_category_description(description: &str) -> Result<(), CoreError> {
    if description.chars().count() > CATEGORY_DESCRIPTION_MAX_LEN {
        return Err(CoreError::Validation(format!(
            "description must be at most {CATEGORY_DESCRIPTION_MAX_LEN} characters"
        )));
    }
    Ok(())
}

/// Reject a category being made its own parent.
pub fn validate_not_self_parent(id: DbId, parent_id: Option<DbId>) -> Result<(), CoreError> {
    if parent_id == Some(id) {
        return Err(CoreError::Validation(
            "A category cannot be its own parent".into(),
        ));
    }
    Ok(())
}

/// Whether re-parenting `category_id` under a parent whose root-first
/// ancestor path is `parent_path` would close a loop.
///
/// `parent_path` includes the parent itself as its last entry.
pub fn would_create_cycle(category_id: DbId, parent_path: &[AncestorEntry]) -> bool {
    parent_path.iter().any(|entry| entry.id == category_id)
}

// ---------------------------------------------------------------------------
// Tree assembly
// ---------------------------------------------------------------------------

/// Anything that can be placed in a category forest.
pub trait TreeItem {
    fn id(&self) -> DbId;
    fn parent_id(&self) -> Option<DbId>;
    fn name(&self) -> &str;
}

/// A node in the assembled forest. The item's own fields are flattened
/// alongside `children` when serialized.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode<T> {
    #[serde(flatten)]
    pub item: T,
    pub children: Vec<TreeNode<T>>,
}

/// Assemble a forest from a flat list.
///
/// Roots are items with no parent, items whose parent is absent from the
/// list, and any cycle members unreachable from a true root. Roots and each
/// child list are sorted by name, case-insensitively.
pub fn build_tree<T: TreeItem>(items: Vec<T>) -> Vec<TreeNode<T>> {
    let ids: HashSet<DbId> = items.iter().map(TreeItem::id).collect();

    // Pass 1: index children by parent.
    let mut children_of: HashMap<DbId, Vec<DbId>> = HashMap::new();
    let mut root_ids = Vec::new();
    for item in &items {
        match item.parent_id() {
            Some(parent) if ids.contains(&parent) && parent != item.id() => {
                children_of.entry(parent).or_default().push(item.id());
            }
            _ => root_ids.push(item.id()),
        }
    }

    let mut by_id: HashMap<DbId, T> = items.into_iter().map(|i| (i.id(), i)).collect();
    let mut placed = HashSet::new();

    // Pass 2: attach from the roots down.
    let mut roots: Vec<TreeNode<T>> = root_ids
        .into_iter()
        .filter_map(|id| assemble(id, &mut by_id, &children_of, &mut placed))
        .collect();

    // Whatever is left sits on a parent cycle with no path to a root.
    let mut stranded: Vec<DbId> = by_id.keys().copied().collect();
    stranded.sort_unstable();
    for id in stranded {
        if let Some(node) = assemble(id, &mut by_id, &children_of, &mut placed) {
            roots.push(node);
        }
    }

    sort_by_name(&mut roots);
    roots
}

fn assemble<T: TreeItem>(
    id: DbId,
    by_id: &mut HashMap<DbId, T>,
    children_of: &HashMap<DbId, Vec<DbId>>,
    placed: &mut HashSet<DbId>,
) -> Option<TreeNode<T>> {
    if !placed.insert(id) {
        return None;
    }
    let item = by_id.remove(&id)?;
    let mut children: Vec<TreeNode<T>> = children_of
        .get(&id)
        .map(|kids| {
            kids.iter()
                .filter_map(|kid| assemble(*kid, by_id, children_of, placed))
                .collect()
        })
        .unwrap_or_default();
    sort_by_name(&mut children);
    Some(TreeNode { item, children })
}

fn sort_by_name<T: TreeItem>(nodes: &mut [TreeNode<T>]) {
    nodes.sort_by_cached_key(|n| n.item.name().to_lowercase());
}

// ---------------------------------------------------------------------------
// Ancestor walk
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AncestorEntry {
    pub id: DbId,
    pub name: String,
}

/// Step-by-step walk from a category up to its root.
///
/// ```text
/// let mut walk = AncestorWalk::new(start);
/// while let Some(id) = walk.next_id() {
///     match lookup(id) {
///         Some(row) => walk.visit(row.id, row.name, row.parent_id)?,
///         None => walk.truncate(),
///     }
/// }
/// let path = walk.finish();
/// ```
#[derive(Debug)]
pub struct AncestorWalk {
    next: Option<DbId>,
    visited: HashSet<DbId>,
    collected: Vec<AncestorEntry>,
}

impl AncestorWalk {
    pub fn new(start: DbId) -> Self {
        Self {
            next: Some(start),
            visited: HashSet::new(),
            collected: Vec::new(),
        }
    }

    /// Id to look up next, or `None` once the root has been reached.
    pub fn next_id(&self) -> Option<DbId> {
        self.next
    }

    /// Record a fetched category and move to its parent.
    pub fn visit(
        &mut self,
        id: DbId,
        name: impl Into<String>,
        parent_id: Option<DbId>,
    ) -> Result<(), CoreError> {
        if !self.visited.insert(id) || self.collected.len() >= MAX_CATEGORY_DEPTH {
            self.next = None;
            return Err(CoreError::CategoryCycle { id });
        }
        self.collected.push(AncestorEntry {
            id,
            name: name.into(),
        });
        self.next = parent_id;
        Ok(())
    }

    /// Stop at a dangling parent reference. The path so far stays valid.
    pub fn truncate(&mut self) {
        self.next = None;
    }

    /// The collected path, root first.
    pub fn finish(mut self) -> Vec<AncestorEntry> {
        self.collected.reverse();
        self.collected
    }
}
