//! Domain Layer - Core Entity Trait
//!
//! Every backend record carries two identifiers: the numeric row id and the
//! stable `documentId`. Mutations are always addressed by the document id.

use serde::{Deserialize, Deserializer, Serialize};

/// Core trait for all backend records
pub trait Entity: Sized + Send + Sync + Clone {
    /// Payload sent to the backend on create/update
    type Draft: Serialize + Send + Sync;

    /// Human readable record kind, used in errors and log lines
    const KIND: &'static str;

    /// Numeric row identifier
    fn id(&self) -> u64;

    /// Stable document identifier
    fn document_id(&self) -> &str;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum DomainError {
    /// A selection did not resolve against the records currently known
    #[error("{kind} not found: {reference}")]
    ReferenceNotFound { kind: String, reference: String },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn reference_not_found(kind: &str, reference: impl Into<String>) -> Self {
        DomainError::ReferenceNotFound {
            kind: kind.to_string(),
            reference: reference.into(),
        }
    }
}

/// Reads `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Required text field: trimmed, must not be blank.
pub(crate) fn required_text(field: &str, value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidInput(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}
