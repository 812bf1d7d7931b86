//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`google`] -- Google ID token verification for social sign-in.

pub mod google;
pub mod jwt;
pub mod password;
