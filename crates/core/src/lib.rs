//! Domain logic for the inotebook backend.
//!
//! Everything in this crate is pure: no database, no HTTP, no clock reads.
//! The repository and API layers call into it for validation, slug
//! generation, category tree assembly, cursor handling, and access checks.

pub mod category_tree;
pub mod contact;
pub mod error;
pub mod note;
pub mod pagination;
pub mod roles;
pub mod slug;
pub mod types;
pub mod user;
