//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`session`] -- session cookie configuration, issuing and parsing.

pub mod password;
pub mod session;
