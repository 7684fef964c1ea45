//! Required Item Entity
//!
//! A concrete requirement belonging to one task. Its completion flag is the
//! current (not historical) state and can be toggled on its own.

use serde::{Deserialize, Serialize};

use super::completion::Completable;
use super::entity::{null_as_default, required_text, DomainResult, Entity};
use super::task::Task;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Required {
    pub id: u64,
    #[serde(rename = "documentId")]
    pub document_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub note: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completion: bool,
    /// Owning task, when populated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<Box<Task>>,
}

impl Required {
    pub fn new(id: u64, document_id: &str, description: &str, completion: bool) -> Self {
        Self {
            id,
            document_id: document_id.to_string(),
            description: description.to_string(),
            completion,
            ..Default::default()
        }
    }

    pub fn task_title(&self) -> Option<&str> {
        self.task.as_deref().map(|task| task.title.as_str())
    }
}

impl Completable for Required {
    fn is_completed(&self) -> bool {
        self.completion
    }
}

impl Entity for Required {
    type Draft = RequiredDraft;
    const KIND: &'static str = "required item";

    fn id(&self) -> u64 {
        self.id
    }

    fn document_id(&self) -> &str {
        &self.document_id
    }
}

/// Create/update payload. Absent fields are left untouched by an update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequiredDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<bool>,
    /// Owning task document id, only sent on create
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
}

impl RequiredDraft {
    pub fn new(description: &str, note: &str, completion: bool) -> DomainResult<Self> {
        Ok(Self {
            description: Some(required_text("description", description)?),
            note: Some(note.to_string()),
            completion: Some(completion),
            task: None,
        })
    }

    /// Payload for toggling completion only
    pub fn completion_only(completion: bool) -> Self {
        Self {
            completion: Some(completion),
            ..Default::default()
        }
    }

    pub fn for_task(mut self, task_document_id: &str) -> Self {
        self.task = Some(task_document_id.to_string());
        self
    }
}
