//! Breakdown planner

use std::sync::Arc;

use llm::{generate_as, LlmError, OutputSchema, StructuredModel};
use serde::{Deserialize, Serialize};

use crate::config::PromptTemplates;
use crate::TaskPriority;

/// One task proposed for a goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedTask {
    pub title: String,
    pub description: String,
    /// Free text such as "2 hours" or "1 day"
    #[serde(rename = "estimatedTime")]
    pub estimated_time: String,
    pub priority: TaskPriority,
}

#[derive(Debug, Deserialize)]
struct SuggestedTasks {
    tasks: Vec<SuggestedTask>,
}

pub fn breakdown_schema() -> OutputSchema {
    let task = OutputSchema::new("task")
        .string("title", "Clear, actionable task title")
        .string("description", "Detailed description of what needs to be done")
        .string(
            "estimatedTime",
            "Estimated time to complete (e.g., \"2 hours\", \"1 day\")",
        )
        .enumeration("priority", &["high", "medium", "low"], "Task priority level");

    OutputSchema::new("task_breakdown").array(
        "tasks",
        task,
        "List of 5-8 actionable tasks broken down from the goal",
    )
}

pub struct BreakdownPlanner {
    model: Arc<dyn StructuredModel>,
    prompts: Arc<PromptTemplates>,
    schema: OutputSchema,
}

impl BreakdownPlanner {
    pub fn new(model: Arc<dyn StructuredModel>, prompts: Arc<PromptTemplates>) -> Self {
        Self {
            model,
            prompts,
            schema: breakdown_schema(),
        }
    }

    /// Ask the model for an ordered task list for `goal`
    pub async fn generate_breakdown(&self, goal: &str) -> Result<Vec<SuggestedTask>, LlmError> {
        let prompt = self.prompts.breakdown_prompt(goal);
        let SuggestedTasks { tasks } = generate_as(self.model.as_ref(), &self.schema, &prompt).await?;

        if tasks.is_empty() {
            return Err(LlmError::InvalidResponse(
                "model returned no tasks for the goal".to_string(),
            ));
        }
        tracing::info!(count = tasks.len(), "Generated task breakdown");
        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct Fixed(Value);

    #[async_trait]
    impl StructuredModel for Fixed {
        async fn generate_object(&self, _schema: &OutputSchema, prompt: &str) -> llm::Result<Value> {
            assert!(prompt.contains("Goal: Launch a referral program"));
            Ok(self.0.clone())
        }
    }

    fn planner(reply: Value) -> BreakdownPlanner {
        BreakdownPlanner::new(Arc::new(Fixed(reply)), Arc::new(PromptTemplates::default()))
    }

    #[tokio::test]
    async fn test_generate_breakdown() {
        let tasks = planner(json!({
            "tasks": [
                { "title": "Define rewards", "description": "Pick incentive tiers", "estimatedTime": "1 day", "priority": "high" },
                { "title": "Draft policy", "description": "Write eligibility rules", "estimatedTime": "2 hours", "priority": "medium" }
            ]
        }))
        .generate_breakdown("Launch a referral program")
        .await
        .unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].estimated_time, "1 day");
        assert_eq!(tasks[0].priority, TaskPriority::High);
    }

    #[tokio::test]
    async fn test_empty_breakdown_is_error() {
        let err = planner(json!({ "tasks": [] }))
            .generate_breakdown("Launch a referral program")
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_priority_outside_enum_is_rejected() {
        let err = planner(json!({
            "tasks": [{ "title": "t", "description": "d", "estimatedTime": "1h", "priority": "urgent" }]
        }))
        .generate_breakdown("Launch a referral program")
        .await
        .unwrap_err();
        assert!(matches!(err, LlmError::SchemaViolation(_)));
    }

    #[test]
    fn test_suggested_task_wire_names() {
        let task = SuggestedTask {
            title: "t".into(),
            description: "d".into(),
            estimated_time: "1 day".into(),
            priority: TaskPriority::Low,
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["estimatedTime"], "1 day");
        assert_eq!(value["priority"], "low");
    }
}
