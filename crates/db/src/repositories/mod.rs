//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod contact_repo;
pub mod event_repo;
pub mod gallery_repo;
pub mod media_repo;
pub mod news_repo;
pub mod permission_repo;
pub mod portrait_repo;
pub mod role_repo;
pub mod user_repo;
pub mod verein_repo;

pub use contact_repo::ContactRepo;
pub use event_repo::EventRepo;
pub use gallery_repo::{AlbumRepo, GalleryImageRepo};
pub use media_repo::MediaRepo;
pub use news_repo::{NewsRepo, PinUpdateError};
pub use permission_repo::PermissionRepo;
pub use portrait_repo::PortraitRepo;
pub use role_repo::RoleRepo;
pub use user_repo::UserRepo;
pub use verein_repo::VereinRepo;
