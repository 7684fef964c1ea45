//! Completion Aggregation
//!
//! A task's progress is the share of its required items marked complete.
//! Both "complete" and "pending" are derived from that single percentage.

use serde::{Deserialize, Serialize};

/// Anything carrying a completion flag
pub trait Completable {
    fn is_completed(&self) -> bool;
}

/// Percentage of completed items, rounded half up. Empty input is 0.
pub fn completion_percent<C: Completable>(items: &[C]) -> u8 {
    let total = items.len();
    if total == 0 {
        return 0;
    }
    let done = items.iter().filter(|item| item.is_completed()).count();
    ((done * 100 + total / 2) / total) as u8
}

/// Derived progress state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Complete,
    Pending,
}

impl TaskStatus {
    pub fn from_percent(percent: u8) -> Self {
        if percent == 100 {
            TaskStatus::Complete
        } else {
            TaskStatus::Pending
        }
    }
}

/// Task list filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl StatusFilter {
    pub fn from_str(s: &str) -> Self {
        match s {
            "completed" => StatusFilter::Completed,
            "pending" => StatusFilter::Pending,
            _ => StatusFilter::All,
        }
    }

    pub fn matches(&self, percent: u8) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => percent == 100,
            StatusFilter::Pending => percent < 100,
        }
    }
}
