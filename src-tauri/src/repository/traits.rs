//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Implementations talk to the REST backend, the local SQLite file, or (in
//! tests) plain memory.

use async_trait::async_trait;
use std::path::Path;

use crate::domain::{DomainError, DomainResult, Entity, Media, Session};

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type. Records are addressed by their stable
/// document id; drafts carry the create/update payload.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Create a new record
    async fn create(&self, draft: &T::Draft) -> DomainResult<T>;

    /// Find a record by document id; `None` when it no longer exists
    async fn find_by_id(&self, document_id: &str) -> DomainResult<Option<T>>;

    /// List all records
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Update an existing record
    async fn update(&self, document_id: &str, draft: &T::Draft) -> DomainResult<T>;

    /// Delete a record by document id
    async fn delete(&self, document_id: &str) -> DomainResult<()>;
}

/// Login against the backend and bearer token handling
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, identifier: &str, password: &str) -> DomainResult<Session>;

    /// Token attached to every subsequent request; `None` signs out
    fn set_token(&self, token: Option<String>);
}

/// A local file queued for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl MediaUpload {
    /// Read a file from disk, guessing its MIME type from the extension
    pub async fn from_path(path: &Path) -> DomainResult<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DomainError::Storage(format!("{}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        let mime = mime_guess::from_path(path).first_or_octet_stream().to_string();
        Ok(Self { file_name, mime, bytes })
    }
}

/// Bulk file upload
#[async_trait]
pub trait MediaRepository: Send + Sync {
    async fn upload(&self, files: Vec<MediaUpload>) -> DomainResult<Vec<Media>>;
}

/// Persisted login session
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save(&self, session: &Session) -> DomainResult<()>;

    async fn load(&self) -> DomainResult<Option<Session>>;

    async fn clear(&self) -> DomainResult<()>;
}
