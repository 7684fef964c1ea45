//! Console Service
//!
//! Owns the signed-in session and the records the console currently shows.
//! Every workflow of the admin console goes through a `Console` method:
//! - auth: login, logout, session restore
//! - dashboard: totals and work still open
//! - branches, follow_ups, tasks: list, filter, edit, delete
//!
//! Loads degrade to empty collections with a `LoadWarning`. Mutations report
//! their error and leave the view state as it was.

mod auth;
mod dashboard;
mod branches;
mod follow_ups;
mod tasks;

#[cfg(test)]
mod test_support;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::ConsoleConfig;
use crate::domain::{Branch, DomainResult, FollowUp, Required, Session, Task};
use crate::repository::{
    AuthGateway, MediaRepository, Repository, SessionStore, StrapiClient, StrapiCollection,
};

pub use dashboard::DashboardSummary;
pub use follow_ups::{
    ChecklistEntry, ElementDetail, FollowUpDetail, FollowUpFilter, FollowUpForm, FollowUpListing,
    MediaView,
};
pub use tasks::TaskSummary;

/// A collection that could not be loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadWarning {
    pub source: String,
    pub message: String,
}

/// Loaded data plus the sources that failed
#[derive(Debug, Clone, Serialize)]
pub struct Loaded<T> {
    pub data: T,
    pub warnings: Vec<LoadWarning>,
}

/// Records currently displayed
#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewState {
    pub branches: Vec<Branch>,
    pub follow_ups: Vec<FollowUp>,
    pub tasks: Vec<Task>,
    pub requireds: Vec<Required>,
}

/// Backend collaborators, one per concern
#[derive(Clone)]
pub struct Backend {
    pub auth: Arc<dyn AuthGateway>,
    pub branches: Arc<dyn Repository<Branch>>,
    pub follow_ups: Arc<dyn Repository<FollowUp>>,
    pub tasks: Arc<dyn Repository<Task>>,
    pub requireds: Arc<dyn Repository<Required>>,
    pub media: Arc<dyn MediaRepository>,
}

impl Backend {
    /// All collaborators served by one Strapi client (shared token)
    pub fn strapi(client: StrapiClient) -> Self {
        Self {
            branches: Arc::new(StrapiCollection::<Branch>::new(client.clone())),
            follow_ups: Arc::new(StrapiCollection::<FollowUp>::new(client.clone())),
            tasks: Arc::new(StrapiCollection::<Task>::new(client.clone())),
            requireds: Arc::new(StrapiCollection::<Required>::new(client.clone())),
            media: Arc::new(client.clone()),
            auth: Arc::new(client),
        }
    }
}

pub struct Console {
    backend: Backend,
    sessions: Arc<dyn SessionStore>,
    upload_url: String,
    session: Option<Session>,
    view: ViewState,
}

impl Console {
    pub fn new(backend: Backend, sessions: Arc<dyn SessionStore>, upload_url: &str) -> Self {
        Self {
            backend,
            sessions,
            upload_url: upload_url.trim_end_matches('/').to_string(),
            session: None,
            view: ViewState::default(),
        }
    }

    /// Console talking to the configured Strapi backend
    pub fn from_config(config: &ConsoleConfig, sessions: Arc<dyn SessionStore>) -> DomainResult<Self> {
        let client = StrapiClient::new(config)?;
        log::info!("[app] backend at {}", client.base_url());
        Ok(Self::new(Backend::strapi(client), sessions, &config.upload_url))
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }
}

/// All-settled: a failed load becomes an empty list plus a warning.
pub(crate) fn settle<T>(
    source: &str,
    result: DomainResult<Vec<T>>,
    warnings: &mut Vec<LoadWarning>,
) -> Vec<T> {
    match result {
        Ok(records) => records,
        Err(e) => {
            log::warn!("[app] failed to load {}: {}", source, e);
            warnings.push(LoadWarning {
                source: source.to_string(),
                message: e.to_string(),
            });
            Vec::new()
        }
    }
}

/// Keep the current list when a post-mutation reload fails.
pub(crate) fn replace_on_success<T>(slot: &mut Vec<T>, source: &str, result: DomainResult<Vec<T>>) {
    match result {
        Ok(records) => *slot = records,
        Err(e) => log::warn!("[app] reload of {} failed, keeping previous list: {}", source, e),
    }
}
