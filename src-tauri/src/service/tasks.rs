//! Tasks and their required items

use serde::Serialize;

use super::{replace_on_success, settle, Console, Loaded};
use crate::domain::{
    resolve_raw, DomainError, DomainResult, Required, RequiredDraft, StatusFilter, Task,
    TaskDraft, TaskStatus,
};

/// A task with its progress badge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskSummary {
    pub task: Task,
    pub completion_percent: u8,
    pub status: TaskStatus,
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self {
            completion_percent: task.completion_percent(),
            status: task.status(),
            task: task.clone(),
        }
    }
}

impl Console {
    pub async fn load_tasks(&mut self) -> Loaded<Vec<TaskSummary>> {
        let mut warnings = Vec::new();
        self.view.tasks = settle("tasks", self.backend.tasks.list().await, &mut warnings);
        Loaded {
            data: self.view.tasks.iter().map(TaskSummary::from).collect(),
            warnings,
        }
    }

    pub fn filter_tasks(&self, filter: StatusFilter) -> Vec<TaskSummary> {
        self.view
            .tasks
            .iter()
            .map(TaskSummary::from)
            .filter(|summary| filter.matches(summary.completion_percent))
            .collect()
    }

    pub async fn get_task(&self, selection: &str) -> DomainResult<Task> {
        let document_id = resolve_raw(&self.view.tasks, selection)?.document_id.clone();
        self.backend
            .tasks
            .find_by_id(&document_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("task {} no longer exists", document_id)))
    }

    /// Create when `selection` is `None`, otherwise update the selected task.
    pub async fn submit_task(
        &mut self,
        selection: Option<&str>,
        title: &str,
        note: &str,
    ) -> DomainResult<Task> {
        let draft = TaskDraft::new(title, note)?;
        let saved = match selection.filter(|s| !s.trim().is_empty()) {
            Some(selection) => {
                let document_id = resolve_raw(&self.view.tasks, selection)?.document_id.clone();
                self.backend.tasks.update(&document_id, &draft).await?
            }
            None => self.backend.tasks.create(&draft).await?,
        };
        self.reload_tasks().await;
        Ok(saved)
    }

    pub async fn delete_task(&mut self, selection: &str) -> DomainResult<()> {
        let document_id = resolve_raw(&self.view.tasks, selection)?.document_id.clone();
        self.backend.tasks.delete(&document_id).await?;
        self.reload_tasks().await;
        Ok(())
    }

    /// Required item for the edit form, looked up in a fresh list
    pub async fn get_required(&mut self, selection: &str) -> DomainResult<Required> {
        self.view.requireds = self.backend.requireds.list().await?;
        resolve_raw(&self.view.requireds, selection).cloned()
    }

    /// Create when `selection` is `None` (linked to `task` when given),
    /// otherwise update the selected item.
    pub async fn submit_required(
        &mut self,
        selection: Option<&str>,
        task: Option<&str>,
        description: &str,
        note: &str,
        completion: bool,
    ) -> DomainResult<Required> {
        let draft = RequiredDraft::new(description, note, completion)?;
        let saved = match selection.filter(|s| !s.trim().is_empty()) {
            Some(selection) => {
                let document_id = self.resolve_required(selection)?;
                self.backend.requireds.update(&document_id, &draft).await?
            }
            None => {
                let draft = match task.filter(|t| !t.trim().is_empty()) {
                    Some(task) => {
                        let task = resolve_raw(&self.view.tasks, task)?;
                        draft.for_task(&task.document_id)
                    }
                    None => draft,
                };
                self.backend.requireds.create(&draft).await?
            }
        };
        self.reload_tasks().await;
        Ok(saved)
    }

    /// Flip a required item's completion outside any follow-up
    pub async fn toggle_requirement(&mut self, selection: &str, completed: bool) -> DomainResult<Required> {
        let document_id = self.resolve_required(selection)?;
        log::info!("[app] toggling required {} to {}", document_id, completed);
        let saved = self
            .backend
            .requireds
            .update(&document_id, &RequiredDraft::completion_only(completed))
            .await?;
        self.reload_tasks().await;
        Ok(saved)
    }

    pub async fn delete_required(&mut self, selection: &str) -> DomainResult<()> {
        let document_id = self.resolve_required(selection)?;
        self.backend.requireds.delete(&document_id).await?;
        self.reload_tasks().await;
        Ok(())
    }

    /// Required items known from the task list and the last required list
    fn resolve_required(&self, selection: &str) -> DomainResult<String> {
        let known: Vec<Required> = self
            .view
            .tasks
            .iter()
            .flat_map(|task| task.requireds.iter().cloned())
            .chain(self.view.requireds.iter().cloned())
            .collect();
        resolve_raw(&known, selection).map(|required| required.document_id.clone())
    }

    pub(crate) async fn reload_tasks(&mut self) {
        let result = self.backend.tasks.list().await;
        replace_on_success(&mut self.view.tasks, "tasks", result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::fixture;

    #[tokio::test]
    async fn test_task_progress_and_filter() {
        let mut fx = fixture().await;
        let loaded = fx.console.load_tasks().await;
        let percents: Vec<u8> = loaded.data.iter().map(|s| s.completion_percent).collect();
        assert_eq!(percents, vec![50, 100, 0]);

        let done = fx.console.filter_tasks(StatusFilter::Completed);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].task.document_id, "t-exit");
        assert_eq!(done[0].status, TaskStatus::Complete);
        assert_eq!(fx.console.filter_tasks(StatusFilter::Pending).len(), 2);
        assert_eq!(fx.console.filter_tasks(StatusFilter::All).len(), 3);
    }

    #[tokio::test]
    async fn test_submit_and_delete_task() {
        let mut fx = fixture().await;
        fx.console.load_tasks().await;

        assert!(fx.console.submit_task(None, " ", "").await.is_err());
        let created = fx.console.submit_task(None, "Alarm test", "monthly").await.unwrap();
        assert_eq!(fx.console.view().tasks.len(), 4);

        let updated = fx
            .console
            .submit_task(Some(&created.id.to_string()), "Alarm test (siren)", "")
            .await
            .unwrap();
        assert_eq!(updated.document_id, created.document_id);

        fx.console.delete_task(&created.document_id).await.unwrap();
        assert_eq!(fx.console.view().tasks.len(), 3);
    }

    #[tokio::test]
    async fn test_new_required_is_linked_by_task_document_id() {
        let mut fx = fixture().await;
        fx.console.load_tasks().await;

        fx.console
            .submit_required(None, Some("3"), "Bandages", "", false)
            .await
            .unwrap();
        let draft = fx.requireds.drafts().pop().unwrap();
        assert_eq!(draft.task.as_deref(), Some("t-kit"));
        assert_eq!(draft.description.as_deref(), Some("Bandages"));
    }

    #[tokio::test]
    async fn test_toggle_requirement_sends_completion_only() {
        let mut fx = fixture().await;
        fx.console.load_tasks().await;

        let saved = fx.console.toggle_requirement("2", true).await.unwrap();
        assert!(saved.completion);
        assert_eq!(saved.description, "Hose pressure");
        assert_eq!(fx.requireds.drafts(), vec![RequiredDraft::completion_only(true)]);
    }

    #[tokio::test]
    async fn test_get_and_update_required() {
        let mut fx = fixture().await;
        let required = fx.console.get_required("r-hose").await.unwrap();
        assert_eq!(required.id, 2);

        let saved = fx
            .console
            .submit_required(Some("r-hose"), None, "Hose pressure check", "gauge", true)
            .await
            .unwrap();
        assert_eq!(saved.note, "gauge");
        assert!(fx.requireds.drafts()[0].task.is_none());

        fx.console.delete_required("2").await.unwrap();
        assert_eq!(fx.requireds.records().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_required() {
        let mut fx = fixture().await;
        fx.console.load_tasks().await;
        assert!(matches!(
            fx.console.toggle_requirement("999", true).await,
            Err(DomainError::ReferenceNotFound { .. })
        ));
        assert!(fx.requireds.drafts().is_empty());
    }
}
