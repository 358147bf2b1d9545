//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod contact;
pub mod event;
pub mod gallery;
pub mod news;
pub mod permission;
pub mod portrait;
pub mod role;
pub mod user;
pub mod verein;
