//! Branch management

use super::{replace_on_success, settle, Console, Loaded};
use crate::domain::{resolve_raw, Branch, BranchDraft, DomainError, DomainResult};

impl Console {
    pub async fn load_branches(&mut self) -> Loaded<Vec<Branch>> {
        let mut warnings = Vec::new();
        self.view.branches = settle("branches", self.backend.branches.list().await, &mut warnings);
        Loaded {
            data: self.view.branches.clone(),
            warnings,
        }
    }

    /// Case-insensitive name search over the loaded branches
    pub fn search_branches(&self, query: &str) -> Vec<Branch> {
        self.view
            .branches
            .iter()
            .filter(|branch| branch.name_contains(query))
            .cloned()
            .collect()
    }

    /// Fresh copy of a listed branch, for the edit form
    pub async fn get_branch(&self, selection: &str) -> DomainResult<Branch> {
        let document_id = resolve_raw(&self.view.branches, selection)?.document_id.clone();
        self.backend
            .branches
            .find_by_id(&document_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("branch {} no longer exists", document_id)))
    }

    /// Create when `selection` is `None`, otherwise update the selected branch.
    pub async fn submit_branch(
        &mut self,
        selection: Option<&str>,
        name: &str,
        info: &str,
    ) -> DomainResult<Branch> {
        let draft = BranchDraft::new(name, info)?;
        let saved = match selection.filter(|s| !s.trim().is_empty()) {
            Some(selection) => {
                let document_id = resolve_raw(&self.view.branches, selection)?.document_id.clone();
                self.backend.branches.update(&document_id, &draft).await?
            }
            None => self.backend.branches.create(&draft).await?,
        };
        self.reload_branches().await;
        Ok(saved)
    }

    pub async fn delete_branch(&mut self, selection: &str) -> DomainResult<()> {
        let document_id = resolve_raw(&self.view.branches, selection)?.document_id.clone();
        self.backend.branches.delete(&document_id).await?;
        self.reload_branches().await;
        Ok(())
    }

    pub(crate) async fn reload_branches(&mut self) {
        let result = self.backend.branches.list().await;
        replace_on_success(&mut self.view.branches, "branches", result);
    }
}
