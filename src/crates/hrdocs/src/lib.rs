//! HR document task orchestration and streamed task execution.
//!
//! This crate drives HR tasks through their lifecycle (document generation,
//! persistence, best-effort email notification) and carries the incremental
//! text-stream protocol used to execute ad-hoc breakdown items.

pub mod api;
pub mod breakdown;
pub mod client;
pub mod config;
pub mod db;
pub mod document_type;
pub mod execution;
pub mod generation;
pub mod lifecycle;
pub mod notify;
pub mod stream;
pub mod version;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub use document_type::DocumentType;
pub use lifecycle::{DocumentOrchestrator, GenerationOutcome, LifecycleError};

/// A string did not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind}: {value}")]
pub struct ParseKindError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseKindError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Lifecycle status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Waiting for generation (initial and rollback state)
    Todo,
    /// Generation in flight
    InProgress,
    /// A document was generated
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Completed];

    /// Storage and wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Whether orchestration may move a task from `self` to `next`.
    ///
    /// Forward moves only, plus the compensating `in_progress -> todo`.
    /// Starting a new generation from `completed` is allowed so repeated runs
    /// accumulate documents.
    pub fn can_advance_to(&self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Todo, TaskStatus::InProgress)
                | (TaskStatus::Completed, TaskStatus::InProgress)
                | (TaskStatus::InProgress, TaskStatus::InProgress)
                | (TaskStatus::InProgress, TaskStatus::Completed)
                | (TaskStatus::InProgress, TaskStatus::Todo)
        )
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseKindError::new("task status", s))
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(ParseKindError::new("task priority", other)),
        }
    }
}

/// Get version information
pub fn version() -> &'static str {
    version::VERSION
}
