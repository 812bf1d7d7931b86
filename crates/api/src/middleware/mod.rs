//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAuth`] -- Any authenticated user.
//! - [`rbac::RequireAdmin`] -- `admin` or higher.
//! - [`rbac::RequireSuperAdmin`] -- `SuperAdmin` only.

pub mod auth;
pub mod rbac;
