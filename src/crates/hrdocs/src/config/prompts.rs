//! Prompt templates
//!
//! Templates are plain strings with `{name}` placeholders. The built-in
//! defaults cover every [`DocumentType`]; the `[prompts]` table of the server
//! configuration replaces individual entries.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::DocumentType;

const EXECUTION_TEMPLATE: &str = "You are an AI task execution agent. Execute the following task by breaking it down into specific, actionable steps and simulating their execution.

Task: {title}
Description: {description}

Provide a step-by-step execution plan. For each step:
1. Describe the specific action being taken
2. Explain what would be done or checked
3. Provide a realistic outcome or result

Format your response as numbered steps with clear actions and results. Be specific and practical. Simulate realistic execution like you're actually performing the work.

Example format:
1. Research market competitors...
   Result: Found 5 main competitors...
2. Analyze pricing strategies...
   Result: Identified 3 pricing tiers...";

const BREAKDOWN_TEMPLATE: &str = "You are a business process expert. Break down the following goal into 5-8 clear, actionable tasks.

Goal: {goal}

Requirements:
- Create specific, actionable tasks (not vague)
- Order tasks logically (dependencies first)
- Include realistic time estimates
- Assign appropriate priorities
- Focus on what would actually need to be done to achieve this goal

Be practical and business-focused.";

fn default_document_template(kind: DocumentType) -> String {
    let (opening, include) = match kind {
        DocumentType::JobDescription => (
            "Generate a professional job description",
            "job title, overview, responsibilities, requirements, qualifications, and benefits",
        ),
        DocumentType::OfferLetter => (
            "Generate a professional offer letter",
            "position, start date, salary, benefits, reporting structure, and acceptance instructions",
        ),
        DocumentType::OnboardingEmail => (
            "Generate a warm onboarding email",
            "welcome message, first day details, required documents, team introduction, and contact info",
        ),
        DocumentType::Policy => (
            "Generate a clear company policy document",
            "policy purpose, scope, guidelines, procedures, and compliance requirements",
        ),
        DocumentType::InterviewQuestions => (
            "Generate insightful interview questions",
            "8-10 questions covering technical skills, behavioral scenarios, and cultural fit",
        ),
        DocumentType::PerformanceReview => (
            "Generate a comprehensive performance review template",
            "performance metrics, achievements, areas for improvement, goals, and development plan",
        ),
        DocumentType::TerminationLetter => (
            "Generate a professional termination letter",
            "termination date, reason (if applicable), final pay details, benefits info, and next steps",
        ),
    };
    format!("{opening} based on: {{description}}. {{context}}\n\nInclude: {include}.")
}

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"));

/// Substitute `{name}` placeholders from `vars`. Unknown names stay as written.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let name = &caps[1];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// `[prompts]` section as written in the configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptOverrides {
    /// Document kind key (e.g. `offer_letter`) to template
    #[serde(default)]
    pub documents: BTreeMap<String, String>,
    #[serde(default)]
    pub execution: Option<String>,
    #[serde(default)]
    pub breakdown: Option<String>,
}

/// Resolved prompt set used at runtime
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplates {
    documents: BTreeMap<String, String>,
    execution: String,
    breakdown: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            documents: DocumentType::ALL
                .into_iter()
                .map(|kind| (kind.as_str().to_string(), default_document_template(kind)))
                .collect(),
            execution: EXECUTION_TEMPLATE.to_string(),
            breakdown: BREAKDOWN_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    /// Defaults with `overrides` applied on top
    pub fn with_overrides(overrides: &PromptOverrides) -> Self {
        let mut templates = Self::default();
        for (kind, template) in &overrides.documents {
            templates.documents.insert(kind.clone(), template.clone());
        }
        if let Some(execution) = &overrides.execution {
            templates.execution = execution.clone();
        }
        if let Some(breakdown) = &overrides.breakdown {
            templates.breakdown = breakdown.clone();
        }
        templates
    }

    /// Drop the template for one kind
    pub fn without_document(mut self, kind: DocumentType) -> Self {
        self.documents.remove(kind.as_str());
        self
    }

    pub fn document_template(&self, kind: DocumentType) -> Option<&str> {
        self.documents.get(kind.as_str()).map(String::as_str)
    }

    /// Rendered document prompt, or `None` when the kind has no template
    pub fn document_prompt(
        &self,
        kind: DocumentType,
        description: &str,
        context: Option<&str>,
    ) -> Option<String> {
        self.document_template(kind).map(|template| {
            render(
                template,
                &[("description", description), ("context", context.unwrap_or(""))],
            )
        })
    }

    pub fn execution_prompt(&self, title: &str, description: &str) -> String {
        render(&self.execution, &[("title", title), ("description", description)])
    }

    pub fn breakdown_prompt(&self, goal: &str) -> String {
        render(&self.breakdown, &[("goal", goal)])
    }
}
