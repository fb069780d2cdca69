//! Database models
//!
//! Timestamps are stored as RFC 3339 strings (TEXT in SQLite) with a fixed
//! microsecond precision, so lexical order equals chronological order.

pub mod document;
pub mod task;

pub use document::{Document, NewDocument};
pub use task::{NewTask, Task, TaskWithDocuments};

use chrono::{SecondsFormat, Utc};

/// Current time in the storage timestamp format
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
