//! Domain Layer
//!
//! Backend records, identifier rules, completion aggregation and the
//! follow-up reconciler. Nothing here performs I/O.

mod entity;
mod identifier;
mod task_ref;
mod completion;
mod branch;
mod task;
mod required;
mod follow_up;
mod session;
mod checklist;

pub use entity::{Entity, DomainError, DomainResult};
pub use identifier::{resolve, resolve_raw, EntityKey};
pub use task_ref::{refers_to_task, RefKeys, TaskRef, TaskRefObject};
pub use completion::{completion_percent, Completable, StatusFilter, TaskStatus};
pub use branch::{Branch, BranchDraft};
pub use task::{Task, TaskDraft};
pub use required::{Required, RequiredDraft};
pub use follow_up::{
    parse_form_date, BranchElement, BranchElementDraft, FollowUp, FollowUpDraft, Media,
    FORM_DATE_FORMAT,
};
pub use session::{AuthUser, Session, SessionInfo};
pub use checklist::{assemble, hydrate, FollowUpFields, TaskChecklistRow};
