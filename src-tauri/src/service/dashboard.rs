//! Dashboard
//!
//! Totals for each collection plus the work still open. The four lists are
//! fetched together; any that fail count as empty.

use serde::Serialize;

use super::{settle, Console, LoadWarning};
use crate::domain::{FollowUp, Required};

const INCOMPLETE_REQUIREDS_SHOWN: usize = 10;
const RECENT_FOLLOW_UPS_SHOWN: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_branches: usize,
    pub total_follow_ups: usize,
    pub total_tasks: usize,
    pub total_requireds: usize,
    /// Required items not yet completed
    pub pending_requireds: usize,
    pub incomplete_requireds: Vec<Required>,
    pub recent_follow_ups: Vec<FollowUp>,
    pub warnings: Vec<LoadWarning>,
}

impl Console {
    pub async fn load_dashboard(&mut self) -> DashboardSummary {
        let (branches, follow_ups, tasks, requireds) = tokio::join!(
            self.backend.branches.list(),
            self.backend.follow_ups.list(),
            self.backend.tasks.list(),
            self.backend.requireds.list(),
        );

        let mut warnings = Vec::new();
        self.view.branches = settle("branches", branches, &mut warnings);
        self.view.follow_ups = settle("follow-ups", follow_ups, &mut warnings);
        self.view.tasks = settle("tasks", tasks, &mut warnings);
        self.view.requireds = settle("requireds", requireds, &mut warnings);

        let incomplete: Vec<&Required> = self
            .view
            .requireds
            .iter()
            .filter(|required| !required.completion)
            .collect();
        log::info!(
            "[app] dashboard: {} of {} required items open",
            incomplete.len(),
            self.view.requireds.len()
        );

        DashboardSummary {
            total_branches: self.view.branches.len(),
            total_follow_ups: self.view.follow_ups.len(),
            total_tasks: self.view.tasks.len(),
            total_requireds: self.view.requireds.len(),
            pending_requireds: incomplete.len(),
            incomplete_requireds: incomplete
                .into_iter()
                .take(INCOMPLETE_REQUIREDS_SHOWN)
                .cloned()
                .collect(),
            recent_follow_ups: self
                .view
                .follow_ups
                .iter()
                .take(RECENT_FOLLOW_UPS_SHOWN)
                .cloned()
                .collect(),
            warnings,
        }
    }
}
