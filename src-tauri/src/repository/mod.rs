//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod db;
mod session_repo;
pub mod strapi;

#[cfg(test)]
pub(crate) mod memory;


pub use traits::{AuthGateway, MediaRepository, MediaUpload, Repository, SessionStore};
pub use db::{init_db, DbConnection};
pub use session_repo::SessionRepository;
pub use strapi::{StrapiClient, StrapiCollection, StrapiResource};
