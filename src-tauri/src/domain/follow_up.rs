//! Follow-up Entity
//!
//! A dated visit report for one branch. Its branch elements record, per
//! standing task, whether the task was satisfied during that visit.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::branch::Branch;
use super::completion::{completion_percent, Completable};
use super::entity::{null_as_default, DomainError, DomainResult, Entity};
use super::task_ref::TaskRef;

/// Datetime-local input format used by the report form
pub const FORM_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowUp {
    pub id: u64,
    #[serde(rename = "documentId")]
    pub document_id: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub responsible: String,
    #[serde(rename = "Recommendations", default, deserialize_with = "null_as_default")]
    pub recommendations: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub media: Vec<Media>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<Box<Branch>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub branch_elements: Vec<BranchElement>,
}

impl FollowUp {
    pub fn branch_name(&self) -> Option<&str> {
        self.branch.as_deref().map(|branch| branch.name.as_str())
    }

    pub fn branch_id(&self) -> Option<u64> {
        self.branch.as_deref().map(|branch| branch.id)
    }

    /// Share of this visit's tasks that were satisfied
    pub fn completion_percent(&self) -> u8 {
        completion_percent(&self.branch_elements)
    }

    /// Date formatted for the form's datetime-local input (UTC)
    pub fn form_date(&self) -> String {
        self.date
            .map(|date| date.format(FORM_DATE_FORMAT).to_string())
            .unwrap_or_default()
    }
}

impl Entity for FollowUp {
    type Draft = FollowUpDraft;
    const KIND: &'static str = "follow-up";

    fn id(&self) -> u64 {
        self.id
    }

    fn document_id(&self) -> &str {
        &self.document_id
    }
}

/// Per-task record inside a follow-up
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "tasks", default)]
    pub task_ref: Option<TaskRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completion: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub note: String,
}

impl Completable for BranchElement {
    fn is_completed(&self) -> bool {
        self.completion
    }
}

/// Uploaded file attached to a follow-up
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub id: u64,
    #[serde(rename = "documentId", default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default)]
    pub mime: Option<String>,
}

impl Media {
    /// Absolute URL; relative upload paths are joined onto `upload_base`
    pub fn resolved_url(&self, upload_base: &str) -> String {
        if self.url.starts_with("http") {
            self.url.clone()
        } else {
            format!("{}{}", upload_base.trim_end_matches('/'), self.url)
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime.as_deref().is_some_and(|mime| mime.starts_with("image/"))
    }
}

/// Wire payload for creating or replacing a follow-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUpDraft {
    /// Branch document id
    pub branch: String,
    pub date: DateTime<Utc>,
    pub responsible: String,
    #[serde(rename = "Recommendations")]
    pub recommendations: String,
    /// Replaces every element stored on the record
    pub branch_elements: Vec<BranchElementDraft>,
    /// Uploaded file ids
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<u64>,
}

/// One emitted branch element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchElementDraft {
    /// Task document id
    #[serde(rename = "tasks")]
    pub task: String,
    pub completion: bool,
    pub note: String,
}

/// Stored report date: RFC 3339, or a bare `YYYY-MM-DD` read as midnight UTC.
/// Anything else reads as no date rather than failing the whole record.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(raw)) => raw,
        _ => return Ok(None),
    };
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(date.with_timezone(&Utc)));
    }
    Ok(NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc()))
}

/// Parse the report date as entered in the form.
///
/// Accepts the datetime-local shape (`2024-05-01T09:30`, read as UTC) or a
/// full RFC 3339 timestamp.
pub fn parse_form_date(raw: &str) -> DomainResult<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DomainError::InvalidInput("date is required".to_string()));
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(date.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, FORM_DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| DomainError::InvalidInput(format!("invalid date: {}", raw)))
}
