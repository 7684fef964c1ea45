//! Record Selection
//!
//! Selector controls and list buttons hand back either the numeric id or the
//! document id of a record. `EntityKey` captures both and resolves them against
//! the records the console currently holds.

use std::fmt;

use super::entity::{DomainError, DomainResult, Entity};

/// A numeric-or-document reference to a record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKey {
    /// Digits-only selection; `raw` keeps the spelling as typed
    Numeric { id: u64, raw: String },
    Document(String),
}

impl EntityKey {
    /// Parse a raw selector value. Blank input selects nothing.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.parse::<u64>() {
            Ok(id) if raw.bytes().all(|b| b.is_ascii_digit()) => Some(EntityKey::Numeric {
                id,
                raw: raw.to_string(),
            }),
            _ => Some(EntityKey::Document(raw.to_string())),
        }
    }

    /// Loose match: a numeric key also matches a document id spelled with the same digits.
    pub fn matches<T: Entity>(&self, entity: &T) -> bool {
        match self {
            EntityKey::Numeric { id, raw } => entity.id() == *id || entity.document_id() == raw,
            EntityKey::Document(document_id) => entity.document_id() == document_id,
        }
    }
}

impl From<u64> for EntityKey {
    fn from(id: u64) -> Self {
        EntityKey::Numeric {
            id,
            raw: id.to_string(),
        }
    }
}

impl From<&str> for EntityKey {
    fn from(document_id: &str) -> Self {
        EntityKey::Document(document_id.to_string())
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Numeric { raw, .. } => write!(f, "{}", raw),
            EntityKey::Document(document_id) => write!(f, "{}", document_id),
        }
    }
}

/// Find the record a key refers to among `known`.
pub fn resolve<'a, T: Entity>(known: &'a [T], key: &EntityKey) -> DomainResult<&'a T> {
    known
        .iter()
        .find(|entity| key.matches(*entity))
        .ok_or_else(|| DomainError::reference_not_found(T::KIND, key.to_string()))
}

/// Parse then resolve a raw selector value; blank input is a failed reference.
pub fn resolve_raw<'a, T: Entity>(known: &'a [T], raw: &str) -> DomainResult<&'a T> {
    let key = EntityKey::parse(raw)
        .ok_or_else(|| DomainError::reference_not_found(T::KIND, raw.trim()))?;
    resolve(known, &key)
}
