//! Follow-up Reconciler
//!
//! Converts between a stored follow-up's `branch_elements` and the per-task
//! checklist shown in the report form.
//!
//! - `hydrate` produces one row per standing task, pulling stored values from
//!   whichever element refers to that task.
//! - `assemble` turns the live rows back into a full replacement payload.
//!
//! Both are pure; loading and saving happen in the console service.

use serde::{Deserialize, Serialize};

use super::branch::Branch;
use super::completion::Completable;
use super::follow_up::{parse_form_date, BranchElementDraft, FollowUp, FollowUpDraft};
use super::identifier::resolve_raw;
use super::entity::DomainResult;
use super::task::Task;
use super::task_ref::refers_to_task;

/// One checkbox + note line of the report form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskChecklistRow {
    pub task: Task,
    pub checked: bool,
    pub note: String,
}

impl TaskChecklistRow {
    pub fn unchecked(task: &Task) -> Self {
        Self {
            task: task.clone(),
            checked: false,
            note: String::new(),
        }
    }
}

impl Completable for TaskChecklistRow {
    fn is_completed(&self) -> bool {
        self.checked
    }
}

/// Build the initial checklist for the form.
///
/// Rows follow `known_tasks` order. Elements whose task is no longer listed
/// are not represented.
pub fn hydrate(existing: Option<&FollowUp>, known_tasks: &[Task]) -> Vec<TaskChecklistRow> {
    known_tasks
        .iter()
        .map(|task| {
            let stored = existing.and_then(|follow_up| {
                follow_up
                    .branch_elements
                    .iter()
                    .find(|element| refers_to_task(element.task_ref.as_ref(), task))
            });
            match stored {
                Some(element) => TaskChecklistRow {
                    task: task.clone(),
                    checked: element.completion,
                    note: element.note.clone(),
                },
                None => TaskChecklistRow::unchecked(task),
            }
        })
        .collect()
}

/// Non-checklist values of the report form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowUpFields {
    /// Branch selection: numeric id or document id
    pub branch: String,
    /// `YYYY-MM-DDTHH:MM` (UTC) or RFC 3339
    pub date: String,
    #[serde(default)]
    pub responsible: String,
    #[serde(default)]
    pub recommendations: String,
    /// Ids returned by a prior media upload
    #[serde(default)]
    pub media: Vec<u64>,
}

/// Build the payload that replaces the follow-up's stored elements.
///
/// Every row is emitted, checked or not, keyed by the task's document id.
/// Fails without producing anything when the branch selection is unknown.
pub fn assemble(
    fields: &FollowUpFields,
    rows: &[TaskChecklistRow],
    known_branches: &[Branch],
) -> DomainResult<FollowUpDraft> {
    let branch = resolve_raw(known_branches, &fields.branch)?;
    let date = parse_form_date(&fields.date)?;

    let branch_elements = rows
        .iter()
        .map(|row| BranchElementDraft {
            task: row.task.document_id.clone(),
            completion: row.checked,
            note: row.note.clone(),
        })
        .collect();

    Ok(FollowUpDraft {
        branch: branch.document_id.clone(),
        date,
        responsible: fields.responsible.trim().to_string(),
        recommendations: fields.recommendations.clone(),
        branch_elements,
        media: fields.media.clone(),
    })
}
