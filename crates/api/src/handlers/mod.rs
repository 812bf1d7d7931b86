pub mod auth;
pub mod categories;
pub mod contact;
pub mod notes;
