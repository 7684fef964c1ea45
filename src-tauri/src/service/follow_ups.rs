//! Follow-up Reports
//!
//! Listing and filtering reports, the detail view, and the report form:
//! opening it hydrates the per-task checklist, submitting it assembles the
//! full replacement payload.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{replace_on_success, settle, Console, Loaded, LoadWarning};
use crate::domain::{
    assemble, hydrate, refers_to_task, resolve_raw, Branch, DomainError, DomainResult, FollowUp,
    FollowUpFields, Media, Task, TaskChecklistRow, FORM_DATE_FORMAT,
};
use crate::repository::MediaUpload;

/// Follow-up list together with the branches used by its filter
#[derive(Debug, Clone, Serialize)]
pub struct FollowUpListing {
    pub follow_ups: Vec<FollowUp>,
    pub branches: Vec<Branch>,
}

/// List filters; empty criteria match everything
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowUpFilter {
    /// Numeric branch id
    #[serde(default)]
    pub branch: Option<u64>,
    /// Case-insensitive substring of the responsible person
    #[serde(default)]
    pub responsible: Option<String>,
    /// Calendar day of the report (UTC)
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl FollowUpFilter {
    pub fn matches(&self, follow_up: &FollowUp) -> bool {
        if let Some(branch_id) = self.branch {
            if follow_up.branch_id() != Some(branch_id) {
                return false;
            }
        }
        if let Some(responsible) = self.responsible.as_deref().map(str::trim) {
            if !responsible.is_empty()
                && !follow_up
                    .responsible
                    .to_lowercase()
                    .contains(&responsible.to_lowercase())
            {
                return false;
            }
        }
        if let Some(day) = self.date {
            if follow_up.date.map(|date| date.date_naive()) != Some(day) {
                return false;
            }
        }
        true
    }
}

/// Media entry with its URL made absolute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaView {
    pub id: u64,
    pub name: String,
    pub url: String,
    pub mime: Option<String>,
    pub is_image: bool,
}

impl MediaView {
    fn new(media: &Media, upload_url: &str) -> Self {
        Self {
            id: media.id,
            name: media.name.clone(),
            url: media.resolved_url(upload_url),
            mime: media.mime.clone(),
            is_image: media.is_image(),
        }
    }
}

/// One task line of the detail view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementDetail {
    /// Title of the referenced task, when it is still listed
    pub task_title: Option<String>,
    pub completion: bool,
    pub note: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowUpDetail {
    pub follow_up: FollowUp,
    pub branch_name: Option<String>,
    pub completion_percent: u8,
    pub elements: Vec<ElementDetail>,
    pub media: Vec<MediaView>,
}

/// Initial state of the report form
#[derive(Debug, Clone, Serialize)]
pub struct FollowUpForm {
    /// Report being edited; `None` for a new one
    pub document_id: Option<String>,
    pub fields: FollowUpFields,
    pub rows: Vec<TaskChecklistRow>,
    pub branches: Vec<Branch>,
    pub media: Vec<MediaView>,
    pub warnings: Vec<LoadWarning>,
}

/// Live checklist line as submitted by the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistEntry {
    /// Task document id (or numeric id)
    pub task: String,
    pub checked: bool,
    #[serde(default)]
    pub note: String,
}

impl Console {
    /// Reports and branches, fetched together
    pub async fn load_follow_ups(&mut self) -> Loaded<FollowUpListing> {
        let (follow_ups, branches) = tokio::join!(
            self.backend.follow_ups.list(),
            self.backend.branches.list(),
        );
        let mut warnings = Vec::new();
        self.view.follow_ups = settle("follow-ups", follow_ups, &mut warnings);
        self.view.branches = settle("branches", branches, &mut warnings);
        Loaded {
            data: FollowUpListing {
                follow_ups: self.view.follow_ups.clone(),
                branches: self.view.branches.clone(),
            },
            warnings,
        }
    }

    pub fn filter_follow_ups(&self, filter: &FollowUpFilter) -> Vec<FollowUp> {
        self.view
            .follow_ups
            .iter()
            .filter(|follow_up| filter.matches(follow_up))
            .cloned()
            .collect()
    }

    /// Full record for the detail view.
    ///
    /// A report deleted elsewhere refreshes the list and reports `NotFound`.
    pub async fn view_follow_up(&mut self, selection: &str) -> DomainResult<FollowUpDetail> {
        let document_id = resolve_raw(&self.view.follow_ups, selection)?.document_id.clone();
        let follow_up = self.fetch_follow_up(&document_id).await?;

        let elements = follow_up
            .branch_elements
            .iter()
            .map(|element| ElementDetail {
                task_title: self
                    .view
                    .tasks
                    .iter()
                    .find(|task| refers_to_task(element.task_ref.as_ref(), task))
                    .map(|task| task.title.clone()),
                completion: element.completion,
                note: element.note.clone(),
            })
            .collect();
        let media = follow_up
            .media
            .iter()
            .map(|media| MediaView::new(media, &self.upload_url))
            .collect();

        Ok(FollowUpDetail {
            branch_name: follow_up.branch_name().map(str::to_string),
            completion_percent: follow_up.completion_percent(),
            elements,
            media,
            follow_up,
        })
    }

    /// Prepare the report form, new (`None`) or editing an existing report.
    ///
    /// A task list that cannot be loaded leaves the checklist empty and adds a
    /// warning; the report itself must load.
    pub async fn open_follow_up_form(&mut self, selection: Option<&str>) -> DomainResult<FollowUpForm> {
        let mut warnings = Vec::new();
        if self.view.branches.is_empty() {
            let branches = self.backend.branches.list().await;
            self.view.branches = settle("branches", branches, &mut warnings);
        }

        let (existing, tasks) = match selection.filter(|s| !s.trim().is_empty()) {
            Some(selection) => {
                let document_id = resolve_raw(&self.view.follow_ups, selection)?.document_id.clone();
                let (existing, tasks) = tokio::join!(
                    self.backend.follow_ups.find_by_id(&document_id),
                    self.backend.tasks.list(),
                );
                match existing? {
                    Some(follow_up) => (Some(follow_up), tasks),
                    None => {
                        self.reload_follow_ups().await;
                        return Err(DomainError::NotFound(format!(
                            "follow-up {} no longer exists",
                            document_id
                        )));
                    }
                }
            }
            None => (None, self.backend.tasks.list().await),
        };

        let tasks_loaded = tasks.is_ok();
        let tasks: Vec<Task> = settle("tasks", tasks, &mut warnings);
        let rows = hydrate(existing.as_ref(), &tasks);
        if tasks_loaded {
            self.view.tasks = tasks;
        }

        let form = match existing {
            Some(follow_up) => FollowUpForm {
                fields: FollowUpFields {
                    branch: follow_up
                        .branch
                        .as_deref()
                        .map(|branch| branch.document_id.clone())
                        .unwrap_or_default(),
                    date: follow_up.form_date(),
                    responsible: follow_up.responsible.clone(),
                    recommendations: follow_up.recommendations.clone(),
                    media: follow_up.media.iter().map(|media| media.id).collect(),
                },
                media: follow_up
                    .media
                    .iter()
                    .map(|media| MediaView::new(media, &self.upload_url))
                    .collect(),
                document_id: Some(follow_up.document_id),
                rows,
                branches: self.view.branches.clone(),
                warnings,
            },
            None => FollowUpForm {
                document_id: None,
                fields: FollowUpFields {
                    date: Utc::now().format(FORM_DATE_FORMAT).to_string(),
                    ..Default::default()
                },
                rows,
                branches: self.view.branches.clone(),
                media: Vec::new(),
                warnings,
            },
        };
        Ok(form)
    }

    /// Save the report form. `target` selects the report to replace; `None`
    /// creates a new one.
    pub async fn submit_follow_up(
        &mut self,
        target: Option<&str>,
        fields: &FollowUpFields,
        entries: &[ChecklistEntry],
    ) -> DomainResult<FollowUp> {
        let rows = entries
            .iter()
            .map(|entry| {
                let task = resolve_raw(&self.view.tasks, &entry.task)?;
                Ok(TaskChecklistRow {
                    task: task.clone(),
                    checked: entry.checked,
                    note: entry.note.clone(),
                })
            })
            .collect::<DomainResult<Vec<_>>>()?;
        let draft = assemble(fields, &rows, &self.view.branches)?;

        let saved = match target.filter(|s| !s.trim().is_empty()) {
            Some(target) => {
                let document_id = resolve_raw(&self.view.follow_ups, target)?.document_id.clone();
                self.backend.follow_ups.update(&document_id, &draft).await?
            }
            None => self.backend.follow_ups.create(&draft).await?,
        };
        log::info!(
            "[app] saved follow-up {} with {} task entries",
            saved.document_id,
            draft.branch_elements.len()
        );
        self.reload_follow_ups().await;
        Ok(saved)
    }

    pub async fn delete_follow_up(&mut self, selection: &str) -> DomainResult<()> {
        let document_id = resolve_raw(&self.view.follow_ups, selection)?.document_id.clone();
        self.backend.follow_ups.delete(&document_id).await?;
        self.reload_follow_ups().await;
        Ok(())
    }

    /// Upload files for the report being edited; returns their records
    pub async fn upload_media(&self, files: Vec<MediaUpload>) -> DomainResult<Vec<MediaView>> {
        let uploaded = self.backend.media.upload(files).await?;
        Ok(uploaded
            .iter()
            .map(|media| MediaView::new(media, &self.upload_url))
            .collect())
    }

    pub async fn upload_media_files(&self, paths: &[PathBuf]) -> DomainResult<Vec<MediaView>> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            files.push(MediaUpload::from_path(path).await?);
        }
        self.upload_media(files).await
    }

    async fn fetch_follow_up(&mut self, document_id: &str) -> DomainResult<FollowUp> {
        match self.backend.follow_ups.find_by_id(document_id).await? {
            Some(follow_up) => Ok(follow_up),
            None => {
                self.reload_follow_ups().await;
                Err(DomainError::NotFound(format!(
                    "follow-up {} no longer exists",
                    document_id
                )))
            }
        }
    }

    pub(crate) async fn reload_follow_ups(&mut self) {
        let result = self.backend.follow_ups.list().await;
        replace_on_success(&mut self.view.follow_ups, "follow-ups", result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BranchElementDraft, TaskRef};
    use crate::repository::Repository;
    use crate::service::test_support::fixture;

    fn fields(branch: &str) -> FollowUpFields {
        FollowUpFields {
            branch: branch.to_string(),
            date: "2024-07-02T08:15".to_string(),
            responsible: "Rami".to_string(),
            recommendations: "Order new hoses".to_string(),
            media: Vec::new(),
        }
    }

    fn entry(task: &str, checked: bool, note: &str) -> ChecklistEntry {
        ChecklistEntry {
            task: task.to_string(),
            checked,
            note: note.to_string(),
        }
    }

    #[tokio::test]
    async fn test_filters() {
        let mut fx = fixture().await;
        fx.console.load_follow_ups().await;

        let by_branch = FollowUpFilter { branch: Some(2), ..Default::default() };
        let found = fx.console.filter_follow_ups(&by_branch);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].document_id, "fu-2");

        let by_person = FollowUpFilter {
            responsible: Some("haddad".to_string()),
            ..Default::default()
        };
        assert_eq!(fx.console.filter_follow_ups(&by_person)[0].document_id, "fu-1");

        let by_day = FollowUpFilter {
            date: NaiveDate::from_ymd_opt(2024, 6, 10),
            ..Default::default()
        };
        assert_eq!(fx.console.filter_follow_ups(&by_day)[0].document_id, "fu-2");

        let nothing = FollowUpFilter {
            branch: Some(1),
            date: NaiveDate::from_ymd_opt(2024, 6, 10),
            ..Default::default()
        };
        assert!(fx.console.filter_follow_ups(&nothing).is_empty());
        assert_eq!(fx.console.filter_follow_ups(&FollowUpFilter::default()).len(), 2);
    }

    #[tokio::test]
    async fn test_open_form_hydrates_checklist() {
        let mut fx = fixture().await;
        fx.console.load_follow_ups().await;

        let form = fx.console.open_follow_up_form(Some("1")).await.unwrap();
        assert_eq!(form.document_id.as_deref(), Some("fu-1"));
        assert_eq!(form.fields.branch, "b-north");
        assert_eq!(form.fields.date, "2024-05-01T09:30");
        assert_eq!(form.rows.len(), 3);
        assert!(form.rows[0].checked);
        assert_eq!(form.rows[0].note, "two replaced");
        assert!(!form.rows[1].checked);
        assert!(!form.rows[2].checked);
        assert!(form.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_open_new_form_without_tasks() {
        let mut fx = fixture().await;
        fx.console.load_follow_ups().await;
        fx.tasks.fail_with(DomainError::Forbidden("tasks".to_string()));

        let form = fx.console.open_follow_up_form(None).await.unwrap();
        assert!(form.document_id.is_none());
        assert!(form.rows.is_empty());
        assert_eq!(form.branches.len(), 2);
        assert_eq!(form.warnings[0].source, "tasks");
    }

    #[tokio::test]
    async fn test_open_form_tracks_emptied_task_list() {
        let mut fx = fixture().await;
        fx.console.load_tasks().await;
        for task in ["t-ext", "t-exit", "t-kit"] {
            fx.tasks.delete(task).await.unwrap();
        }

        let form = fx.console.open_follow_up_form(None).await.unwrap();
        assert!(form.rows.is_empty());
        assert!(form.warnings.is_empty());
        assert!(fx.console.view().tasks.is_empty());
        assert!(fx.console.filter_tasks(crate::domain::StatusFilter::All).is_empty());
    }

    #[tokio::test]
    async fn test_open_form_keeps_tasks_when_reload_fails() {
        let mut fx = fixture().await;
        fx.console.load_tasks().await;
        fx.tasks.fail_with(DomainError::Backend("500: down".to_string()));

        let form = fx.console.open_follow_up_form(None).await.unwrap();
        assert!(form.rows.is_empty());
        assert_eq!(form.warnings[0].source, "tasks");
        assert_eq!(fx.console.view().tasks.len(), 3);
    }

    #[tokio::test]
    async fn test_open_form_fails_when_report_cannot_load() {
        let mut fx = fixture().await;
        fx.console.load_follow_ups().await;
        fx.follow_ups.fail_with(DomainError::Backend("500: boom".to_string()));

        assert_eq!(
            fx.console.open_follow_up_form(Some("fu-1")).await.unwrap_err(),
            DomainError::Backend("500: boom".to_string())
        );
        assert_eq!(fx.console.view().follow_ups.len(), 2);
        assert!(fx.follow_ups.drafts().is_empty());
    }

    #[tokio::test]
    async fn test_open_form_for_deleted_report() {
        let mut fx = fixture().await;
        fx.console.load_follow_ups().await;
        fx.follow_ups.delete("fu-2").await.unwrap();

        assert!(matches!(
            fx.console.open_follow_up_form(Some("fu-2")).await,
            Err(DomainError::NotFound(_))
        ));
        assert_eq!(fx.console.view().follow_ups.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_new_report() {
        let mut fx = fixture().await;
        fx.console.load_follow_ups().await;
        fx.console.open_follow_up_form(None).await.unwrap();

        let entries = vec![
            entry("t-ext", true, ""),
            entry("2", false, "door jammed"),
            entry("t-kit", true, "restocked"),
        ];
        let saved = fx.console.submit_follow_up(None, &fields("1"), &entries).await.unwrap();
        assert_eq!(saved.branch.as_deref().map(|b| b.document_id.as_str()), Some("b-north"));

        let draft = fx.follow_ups.drafts().pop().unwrap();
        assert_eq!(draft.branch, "b-north");
        assert_eq!(
            draft.branch_elements,
            vec![
                BranchElementDraft { task: "t-ext".to_string(), completion: true, note: String::new() },
                BranchElementDraft { task: "t-exit".to_string(), completion: false, note: "door jammed".to_string() },
                BranchElementDraft { task: "t-kit".to_string(), completion: true, note: "restocked".to_string() },
            ]
        );
        assert_eq!(fx.console.view().follow_ups.len(), 3);
    }

    #[tokio::test]
    async fn test_submit_updates_by_document_id() {
        let mut fx = fixture().await;
        fx.console.load_follow_ups().await;
        fx.console.open_follow_up_form(Some("2")).await.unwrap();

        let mut form = fields("b-south");
        form.media = vec![7];
        let saved = fx
            .console
            .submit_follow_up(Some("2"), &form, &[entry("t-exit", true, "")])
            .await
            .unwrap();
        assert_eq!(saved.document_id, "fu-2");
        assert_eq!(fx.follow_ups.drafts()[0].media, vec![7]);
        assert!(matches!(
            saved.branch_elements[0].task_ref,
            Some(TaskRef::Document(ref doc)) if doc == "t-exit"
        ));
    }

    #[tokio::test]
    async fn test_submit_with_unknown_branch_sends_nothing() {
        let mut fx = fixture().await;
        fx.console.load_follow_ups().await;
        fx.console.open_follow_up_form(None).await.unwrap();

        let err = fx
            .console
            .submit_follow_up(None, &fields("77"), &[entry("t-ext", true, "")])
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::reference_not_found("branch", "77"));
        assert!(fx.follow_ups.drafts().is_empty());
        assert_eq!(fx.console.view().follow_ups.len(), 2);
    }

    #[tokio::test]
    async fn test_submit_with_unknown_task_sends_nothing() {
        let mut fx = fixture().await;
        fx.console.load_follow_ups().await;
        fx.console.open_follow_up_form(None).await.unwrap();

        assert!(matches!(
            fx.console.submit_follow_up(None, &fields("1"), &[entry("t-gone", true, "")]).await,
            Err(DomainError::ReferenceNotFound { .. })
        ));
        assert!(fx.follow_ups.drafts().is_empty());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_list() {
        let mut fx = fixture().await;
        fx.console.load_follow_ups().await;
        fx.console.open_follow_up_form(None).await.unwrap();
        fx.follow_ups.fail_with(DomainError::Backend("500: boom".to_string()));

        assert!(fx
            .console
            .submit_follow_up(None, &fields("1"), &[entry("t-ext", true, "")])
            .await
            .is_err());
        assert_eq!(fx.console.view().follow_ups.len(), 2);
    }

    #[tokio::test]
    async fn test_view_detail() {
        let mut fx = fixture().await;
        fx.console.load_dashboard().await;

        let detail = fx.console.view_follow_up("fu-1").await.unwrap();
        assert_eq!(detail.branch_name.as_deref(), Some("North Station"));
        assert_eq!(detail.completion_percent, 100);
        assert_eq!(detail.elements[0].task_title.as_deref(), Some("Extinguishers"));
        assert_eq!(detail.media[0].url, "http://localhost:1337/uploads/hall.jpg");
        assert!(detail.media[0].is_image);
    }

    #[tokio::test]
    async fn test_delete_report() {
        let mut fx = fixture().await;
        fx.console.load_follow_ups().await;
        fx.console.delete_follow_up("1").await.unwrap();
        assert_eq!(fx.console.view().follow_ups.len(), 1);
        assert_eq!(fx.follow_ups.records().len(), 1);
    }

    #[tokio::test]
    async fn test_upload_media_files() {
        let fx = fixture().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hall.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let uploaded = fx.console.upload_media_files(&[path]).await.unwrap();
        assert_eq!(uploaded.len(), 1);
        assert_eq!(uploaded[0].mime.as_deref(), Some("image/png"));
        assert_eq!(uploaded[0].url, "http://localhost:1337/uploads/hall.png");

        let missing = dir.path().join("missing.jpg");
        assert!(matches!(
            fx.console.upload_media_files(&[missing]).await,
            Err(DomainError::Storage(_))
        ));
    }
}
