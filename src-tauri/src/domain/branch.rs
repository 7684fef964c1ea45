//! Branch Entity
//!
//! A civil-defense branch that receives periodic follow-up visits.

use serde::{Deserialize, Serialize};

use super::entity::{null_as_default, required_text, DomainResult, Entity};
use super::follow_up::FollowUp;

/// A branch as returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: u64,
    #[serde(rename = "documentId")]
    pub document_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub info: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub follow_ups: Vec<FollowUp>,
}

impl Branch {
    pub fn new(id: u64, document_id: &str, name: &str) -> Self {
        Self {
            id,
            document_id: document_id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Case-insensitive name search
    pub fn name_contains(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.trim().to_lowercase())
    }
}

impl Entity for Branch {
    type Draft = BranchDraft;
    const KIND: &'static str = "branch";

    fn id(&self) -> u64 {
        self.id
    }

    fn document_id(&self) -> &str {
        &self.document_id
    }
}

/// Create/update payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchDraft {
    pub name: String,
    pub info: String,
}

impl BranchDraft {
    pub fn new(name: &str, info: &str) -> DomainResult<Self> {
        Ok(Self {
            name: required_text("name", name)?,
            info: info.to_string(),
        })
    }
}
