//! Seeded console over in-memory repositories

use chrono::{TimeZone, Utc};
use std::path::Path;
use std::sync::Arc;

use super::{Backend, Console};
use crate::domain::{Branch, BranchElement, FollowUp, Media, Required, Task, TaskRef};
use crate::repository::memory::{MemoryAuth, MemoryMedia, MemoryRepository};
use crate::repository::{init_db, SessionRepository};

pub(crate) struct Fixture {
    pub console: Console,
    pub auth: Arc<MemoryAuth>,
    pub branches: Arc<MemoryRepository<Branch>>,
    pub follow_ups: Arc<MemoryRepository<FollowUp>>,
    pub tasks: Arc<MemoryRepository<Task>>,
    pub requireds: Arc<MemoryRepository<Required>>,
    pub sessions: Arc<SessionRepository>,
}

fn required(id: u64, document_id: &str, description: &str, completion: bool) -> Required {
    Required::new(id, document_id, description, completion)
}

fn seed_tasks() -> Vec<Task> {
    let mut extinguishers = Task::new(1, "t-ext", "Extinguishers");
    extinguishers.requireds = vec![
        required(1, "r-tags", "Inspection tags", true),
        required(2, "r-hose", "Hose pressure", false),
    ];
    let mut exits = Task::new(2, "t-exit", "Emergency exits");
    exits.requireds = vec![required(3, "r-sign", "Lit exit signs", true)];
    let kit = Task::new(3, "t-kit", "First aid kit");
    vec![extinguishers, exits, kit]
}

fn seed_follow_ups(branches: &[Branch]) -> Vec<FollowUp> {
    vec![
        FollowUp {
            id: 1,
            document_id: "fu-1".to_string(),
            date: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).single(),
            responsible: "Omar Haddad".to_string(),
            recommendations: "Keep tags current".to_string(),
            media: vec![Media {
                id: 40,
                name: "hall.jpg".to_string(),
                url: "/uploads/hall.jpg".to_string(),
                mime: Some("image/jpeg".to_string()),
                ..Default::default()
            }],
            branch: Some(Box::new(branches[0].clone())),
            branch_elements: vec![BranchElement {
                id: Some(1),
                task_ref: Some(TaskRef::object(Some("t-ext"), Some(1))),
                completion: true,
                note: "two replaced".to_string(),
            }],
        },
        FollowUp {
            id: 2,
            document_id: "fu-2".to_string(),
            date: Utc.with_ymd_and_hms(2024, 6, 10, 14, 0, 0).single(),
            responsible: "Lina".to_string(),
            branch: Some(Box::new(branches[1].clone())),
            branch_elements: vec![BranchElement {
                id: Some(2),
                task_ref: Some(TaskRef::Numeric(2)),
                completion: false,
                note: String::new(),
            }],
            ..Default::default()
        },
    ]
}

pub(crate) async fn fixture() -> Fixture {
    let branches = vec![
        Branch::new(1, "b-north", "North Station"),
        Branch::new(2, "b-south", "South Depot"),
    ];
    let follow_ups = seed_follow_ups(&branches);
    let tasks = seed_tasks();
    let requireds: Vec<Required> = tasks.iter().flat_map(|t| t.requireds.clone()).collect();

    let auth = Arc::new(MemoryAuth::new("secret"));
    let branches = Arc::new(MemoryRepository::with(branches));
    let follow_ups = Arc::new(MemoryRepository::with(follow_ups));
    let tasks = Arc::new(MemoryRepository::with(tasks));
    let requireds = Arc::new(MemoryRepository::with(requireds));
    let conn = init_db(Path::new(":memory:")).await.unwrap();
    let sessions = Arc::new(SessionRepository::new(conn));

    let backend = Backend {
        auth: auth.clone(),
        branches: branches.clone(),
        follow_ups: follow_ups.clone(),
        tasks: tasks.clone(),
        requireds: requireds.clone(),
        media: Arc::new(MemoryMedia::default()),
    };
    let console = Console::new(backend, sessions.clone(), "http://localhost:1337/");

    Fixture {
        console,
        auth,
        branches,
        follow_ups,
        tasks,
        requireds,
        sessions,
    }
}
