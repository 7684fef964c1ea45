//! Task References
//!
//! A branch element points at its task through the `tasks` field, and the
//! backend has returned that field in several shapes over time depending on
//! how the relation was populated:
//!
//! - `{ "documentId": "abc", ... }` (populated relation)
//! - `{ "id": 5 }` (relation populated with the numeric key only)
//! - `"abc"` (bare document id)
//! - `5` (bare numeric id)
//!
//! Every shape is normalised into optional (document id, numeric id) keys
//! before comparison, so matching stays exhaustive and never fails.

use serde::{Deserialize, Serialize};

use super::task::Task;

/// Relation object as populated by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskRefObject {
    #[serde(rename = "documentId", default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

/// Any historical shape of a branch element's task reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskRef {
    Numeric(u64),
    Document(String),
    Object(TaskRefObject),
    /// Arrays, booleans and other shapes; refers to nothing
    Unrecognized(serde_json::Value),
}

/// Identifier keys extracted from a reference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefKeys<'a> {
    pub document_id: Option<&'a str>,
    pub id: Option<u64>,
}

impl TaskRef {
    pub fn object(document_id: Option<&str>, id: Option<u64>) -> Self {
        TaskRef::Object(TaskRefObject {
            document_id: document_id.map(str::to_string),
            id,
        })
    }

    /// Normalise into comparable keys
    pub fn keys(&self) -> RefKeys<'_> {
        match self {
            TaskRef::Object(object) => RefKeys {
                document_id: object.document_id.as_deref(),
                id: object.id,
            },
            TaskRef::Document(document_id) => RefKeys {
                document_id: Some(document_id.as_str()),
                id: None,
            },
            TaskRef::Numeric(id) => RefKeys {
                document_id: None,
                id: Some(*id),
            },
            TaskRef::Unrecognized(_) => RefKeys::default(),
        }
    }
}

/// Whether a (possibly absent) reference designates `task`.
///
/// Stable id is compared first, then the numeric id. A numeric-looking string
/// never matches a numeric id.
pub fn refers_to_task(task_ref: Option<&TaskRef>, task: &Task) -> bool {
    let Some(task_ref) = task_ref else {
        return false;
    };
    let keys = task_ref.keys();
    if keys.document_id.is_some_and(|doc| doc == task.document_id) {
        return true;
    }
    keys.id.is_some_and(|id| id == task.id)
}
