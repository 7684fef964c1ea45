//! Task Entity
//!
//! A standing checklist item that recurs on every follow-up visit. Each task
//! owns the required items that measure its current progress.

use serde::{Deserialize, Serialize};

use super::completion::{completion_percent, TaskStatus};
use super::entity::{null_as_default, required_text, DomainResult, Entity};
use super::required::Required;

/// A task as returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    #[serde(rename = "documentId")]
    pub document_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub note: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requireds: Vec<Required>,
}

impl Task {
    pub fn new(id: u64, document_id: &str, title: &str) -> Self {
        Self {
            id,
            document_id: document_id.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn completion_percent(&self) -> u8 {
        completion_percent(&self.requireds)
    }

    pub fn status(&self) -> TaskStatus {
        TaskStatus::from_percent(self.completion_percent())
    }
}

impl Entity for Task {
    type Draft = TaskDraft;
    const KIND: &'static str = "task";

    fn id(&self) -> u64 {
        self.id
    }

    fn document_id(&self) -> &str {
        &self.document_id
    }
}

/// Create/update payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub note: String,
}

impl TaskDraft {
    pub fn new(title: &str, note: &str) -> DomainResult<Self> {
        Ok(Self {
            title: required_text("title", title)?,
            note: note.to_string(),
        })
    }
}
