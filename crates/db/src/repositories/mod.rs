//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod contact_request_repo;
pub mod note_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use contact_request_repo::ContactRequestRepo;
pub use note_repo::NoteRepo;
pub use user_repo::UserRepo;
