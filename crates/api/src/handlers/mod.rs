pub mod auth;
pub mod contacts;
pub mod events;
pub mod gallery;
pub mod media;
pub mod news;
pub mod permissions;
pub mod portraits;
pub mod roles;
pub mod users;
pub mod vereine;
