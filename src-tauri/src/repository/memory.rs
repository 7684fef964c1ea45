//! In-memory Repositories
//!
//! Test doubles for the repository traits. Records live in a `Vec`, every
//! submitted draft is kept for inspection, and any repository can be switched
//! into a failing state.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use super::traits::{AuthGateway, MediaRepository, MediaUpload, Repository};
use crate::domain::{
    AuthUser, Branch, BranchElement, DomainError, DomainResult, Entity, FollowUp, Media,
    Required, Session, Task, TaskRef,
};

/// Builds a stored record from a draft, as the backend would
pub trait FromDraft: Entity {
    fn from_draft(id: u64, document_id: String, draft: &Self::Draft, existing: Option<&Self>) -> Self;
}

impl FromDraft for Branch {
    fn from_draft(id: u64, document_id: String, draft: &Self::Draft, existing: Option<&Self>) -> Self {
        Branch {
            id,
            document_id,
            name: draft.name.clone(),
            info: draft.info.clone(),
            follow_ups: existing.map(|b| b.follow_ups.clone()).unwrap_or_default(),
        }
    }
}

impl FromDraft for Task {
    fn from_draft(id: u64, document_id: String, draft: &Self::Draft, existing: Option<&Self>) -> Self {
        Task {
            id,
            document_id,
            title: draft.title.clone(),
            note: draft.note.clone(),
            requireds: existing.map(|t| t.requireds.clone()).unwrap_or_default(),
        }
    }
}

impl FromDraft for Required {
    fn from_draft(id: u64, document_id: String, draft: &Self::Draft, existing: Option<&Self>) -> Self {
        let mut required = existing.cloned().unwrap_or_default();
        required.id = id;
        required.document_id = document_id;
        if let Some(description) = &draft.description {
            required.description = description.clone();
        }
        if let Some(note) = &draft.note {
            required.note = note.clone();
        }
        if let Some(completion) = draft.completion {
            required.completion = completion;
        }
        if let Some(task) = &draft.task {
            required.task = Some(Box::new(Task::new(0, task, "")));
        }
        required
    }
}

impl FromDraft for FollowUp {
    fn from_draft(id: u64, document_id: String, draft: &Self::Draft, _existing: Option<&Self>) -> Self {
        FollowUp {
            id,
            document_id,
            date: Some(draft.date),
            responsible: draft.responsible.clone(),
            recommendations: draft.recommendations.clone(),
            media: draft
                .media
                .iter()
                .map(|media_id| Media {
                    id: *media_id,
                    ..Default::default()
                })
                .collect(),
            branch: Some(Box::new(Branch::new(0, &draft.branch, ""))),
            branch_elements: draft
                .branch_elements
                .iter()
                .map(|element| BranchElement {
                    id: None,
                    task_ref: Some(TaskRef::Document(element.task.clone())),
                    completion: element.completion,
                    note: element.note.clone(),
                })
                .collect(),
        }
    }
}

pub struct MemoryRepository<T: Entity> {
    records: Mutex<Vec<T>>,
    drafts: Mutex<Vec<T::Draft>>,
    next_id: AtomicU64,
    failure: Mutex<Option<DomainError>>,
}

impl<T> MemoryRepository<T>
where
    T: FromDraft,
    T::Draft: Clone,
{
    pub fn with(records: Vec<T>) -> Self {
        let next_id = records.iter().map(|r| r.id()).max().unwrap_or(0) + 1;
        Self {
            records: Mutex::new(records),
            drafts: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(next_id),
            failure: Mutex::new(None),
        }
    }

    pub fn records(&self) -> Vec<T> {
        self.records.lock().unwrap().clone()
    }

    /// Drafts received by create/update, oldest first
    pub fn drafts(&self) -> Vec<T::Draft> {
        self.drafts.lock().unwrap().clone()
    }

    /// Make every following call fail with `err`
    pub fn fail_with(&self, err: DomainError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    fn check(&self) -> DomainResult<()> {
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn not_found(document_id: &str) -> DomainError {
        DomainError::NotFound(format!("{} {}", T::KIND, document_id))
    }
}

#[async_trait]
impl<T> Repository<T> for MemoryRepository<T>
where
    T: FromDraft + 'static,
    T::Draft: Clone,
{
    async fn create(&self, draft: &T::Draft) -> DomainResult<T> {
        self.check()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let document_id = format!("{}-{}", T::KIND.replace(' ', "-"), id);
        let record = T::from_draft(id, document_id, draft, None);
        self.drafts.lock().unwrap().push(draft.clone());
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, document_id: &str) -> DomainResult<Option<T>> {
        self.check()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.document_id() == document_id)
            .cloned())
    }

    async fn list(&self) -> DomainResult<Vec<T>> {
        self.check()?;
        Ok(self.records())
    }

    async fn update(&self, document_id: &str, draft: &T::Draft) -> DomainResult<T> {
        self.check()?;
        let mut records = self.records.lock().unwrap();
        let slot = records
            .iter_mut()
            .find(|r| r.document_id() == document_id)
            .ok_or_else(|| Self::not_found(document_id))?;
        let updated = T::from_draft(slot.id(), document_id.to_string(), draft, Some(&*slot));
        *slot = updated.clone();
        self.drafts.lock().unwrap().push(draft.clone());
        Ok(updated)
    }

    async fn delete(&self, document_id: &str) -> DomainResult<()> {
        self.check()?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.document_id() != document_id);
        if records.len() == before {
            return Err(Self::not_found(document_id));
        }
        Ok(())
    }
}

/// Accepts a single password; remembers the bearer token it was given.
pub struct MemoryAuth {
    password: String,
    token: Mutex<Option<String>>,
}

impl MemoryAuth {
    pub fn new(password: &str) -> Self {
        Self {
            password: password.to_string(),
            token: Mutex::new(None),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthGateway for MemoryAuth {
    async fn login(&self, identifier: &str, password: &str) -> DomainResult<Session> {
        if password != self.password {
            return Err(DomainError::InvalidInput(
                "Invalid identifier or password".to_string(),
            ));
        }
        let user = AuthUser {
            id: 1,
            username: identifier.to_string(),
            email: format!("{}@branch.test", identifier),
        };
        Ok(Session::new(&format!("jwt-{}", identifier), user))
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }
}

/// Stores nothing; hands back sequential file records.
#[derive(Default)]
pub struct MemoryMedia {
    next_id: AtomicU64,
}

#[async_trait]
impl MediaRepository for MemoryMedia {
    async fn upload(&self, files: Vec<MediaUpload>) -> DomainResult<Vec<Media>> {
        Ok(files
            .into_iter()
            .map(|file| Media {
                id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
                document_id: None,
                url: format!("/uploads/{}", file.file_name),
                name: file.file_name,
                mime: Some(file.mime),
            })
            .collect())
    }
}
