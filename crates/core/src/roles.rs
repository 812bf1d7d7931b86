//! Role names and the rank lattice used by every access check.
//!
//! Roles are totally ordered: `user < admin < SuperAdmin`. Guards state the
//! minimum rank they require, so a SuperAdmin passes every admin check.
//! The string forms must match the `ck_users_role` constraint in
//! `20250101000002_create_users.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SUPER_ADMIN: &str = "SuperAdmin";

/// A user's role. Variant order defines rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "SuperAdmin")]
    SuperAdmin,
}

impl Role {
    /// Persisted string form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => ROLE_USER,
            Self::Admin => ROLE_ADMIN,
            Self::SuperAdmin => ROLE_SUPER_ADMIN,
        }
    }

    /// Whether this role ranks at or above `min`.
    pub fn at_least(self, min: Role) -> bool {
        self >= min
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_USER => Ok(Self::User),
            ROLE_ADMIN => Ok(Self::Admin),
            ROLE_SUPER_ADMIN => Ok(Self::SuperAdmin),
            other => Err(CoreError::Validation(format!("Unknown role '{other}'"))),
        }
    }
}

/// Reject callers whose role ranks below `min`.
pub fn require_rank(role: Role, min: Role) -> Result<(), CoreError> {
    if role.at_least(min) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!("{min} role required")))
    }
}

/// Permit the resource owner, or anyone ranked admin or higher.
///
/// Existence of the resource must be checked by the caller first so that a
/// missing resource reports 404 rather than 403.
pub fn ensure_owner_or_admin(
    requester_id: DbId,
    requester_role: Role,
    owner_id: DbId,
) -> Result<(), CoreError> {
    if requester_id == owner_id || requester_role.at_least(Role::Admin) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the owner or an admin may modify this resource".into(),
        ))
    }
}
