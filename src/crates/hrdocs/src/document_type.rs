//! Kinds of HR documents a task can produce.

use crate::ParseKindError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Document kind, stored in the `type` column of tasks and documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    JobDescription,
    OfferLetter,
    OnboardingEmail,
    Policy,
    InterviewQuestions,
    PerformanceReview,
    TerminationLetter,
}

impl DocumentType {
    pub const ALL: [DocumentType; 7] = [
        DocumentType::JobDescription,
        DocumentType::OfferLetter,
        DocumentType::OnboardingEmail,
        DocumentType::Policy,
        DocumentType::InterviewQuestions,
        DocumentType::PerformanceReview,
        DocumentType::TerminationLetter,
    ];

    /// Storage key, also the prompt template key.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::JobDescription => "job_description",
            DocumentType::OfferLetter => "offer_letter",
            DocumentType::OnboardingEmail => "onboarding_email",
            DocumentType::Policy => "policy",
            DocumentType::InterviewQuestions => "interview_questions",
            DocumentType::PerformanceReview => "performance_review",
            DocumentType::TerminationLetter => "termination_letter",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::JobDescription => "Job Description",
            DocumentType::OfferLetter => "Offer Letter",
            DocumentType::OnboardingEmail => "Onboarding Email",
            DocumentType::Policy => "Company Policy",
            DocumentType::InterviewQuestions => "Interview Questions",
            DocumentType::PerformanceReview => "Performance Review",
            DocumentType::TerminationLetter => "Termination Letter",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseKindError::new("document type", s))
    }
}
