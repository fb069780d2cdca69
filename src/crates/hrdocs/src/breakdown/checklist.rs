//! Breakdown checklist

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::breakdown::SuggestedTask;
use crate::stream::ExecutionOutcome;
use crate::TaskPriority;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownItem {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "estimatedTime", skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    pub completed: bool,
}

/// A goal and its ordered items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskBreakdown {
    pub id: String,
    pub goal: String,
    pub items: Vec<BreakdownItem>,
    pub created_at: DateTime<Utc>,
}

impl TaskBreakdown {
    pub fn from_suggestions(goal: impl Into<String>, tasks: Vec<SuggestedTask>) -> Self {
        let items = tasks
            .into_iter()
            .map(|task| BreakdownItem {
                id: Uuid::new_v4().to_string(),
                title: task.title,
                description: task.description,
                estimated_time: Some(task.estimated_time),
                priority: Some(task.priority),
                completed: false,
            })
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            goal: goal.into(),
            items,
            created_at: Utc::now(),
        }
    }

    pub fn item(&self, item_id: &str) -> Option<&BreakdownItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Flip an item's completion; returns the new value
    pub fn toggle(&mut self, item_id: &str) -> Option<bool> {
        let item = self.items.iter_mut().find(|item| item.id == item_id)?;
        item.completed = !item.completed;
        Some(item.completed)
    }

    /// Mark an item done; false when the id is unknown
    pub fn mark_done(&mut self, item_id: &str) -> bool {
        match self.items.iter_mut().find(|item| item.id == item_id) {
            Some(item) => {
                item.completed = true;
                true
            }
            None => false,
        }
    }

    /// Mark the executed item done iff its execution completed
    pub fn apply_outcome(&mut self, item_id: &str, outcome: &ExecutionOutcome) -> bool {
        outcome.on_completed(|_| {
            self.mark_done(item_id);
        })
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }

    /// Markdown checklist export
    pub fn to_markdown(&self) -> String {
        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                format!(
                    "{}. [{}] {}\n   {}",
                    i + 1,
                    if item.completed { "x" } else { " " },
                    item.title,
                    item.description
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        format!("# {}\n\n{}", self.goal, items)
    }
}
