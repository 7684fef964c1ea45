//! Strapi Backend
//!
//! REST implementations of the repository traits:
//! - client: HTTP plumbing, token, envelopes, error mapping
//! - collection: CRUD per collection
//! - auth: login
//! - upload: bulk media upload

mod client;
mod collection;
mod auth;
mod upload;

pub use client::StrapiClient;
pub use collection::{StrapiCollection, StrapiResource};
