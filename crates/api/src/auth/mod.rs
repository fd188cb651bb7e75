//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- HS256 session-token generation and validation.
//! - [`cookie`] -- The `auth_token` session cookie.

pub mod cookie;
pub mod jwt;
pub mod password;
