//! Goal breakdown
//!
//! A goal is split by the model into a handful of suggested tasks; the
//! resulting checklist tracks which items have been executed.

pub mod checklist;
pub mod planner;

pub use checklist::{BreakdownItem, TaskBreakdown};
pub use planner::{breakdown_schema, BreakdownPlanner, SuggestedTask};
