//! Domain logic for the Gemeinde website backend.
//!
//! Everything here is synchronous and free of I/O so it can be unit tested
//! directly and shared by the database, storage, and API crates.

pub mod error;
pub mod media;
pub mod pagination;
pub mod permissions;
pub mod pinning;
pub mod portrait;
pub mod roles;
pub mod session;
pub mod types;
pub mod validation;
