//! Document Store
//!
//! SQLite persistence for tasks and the documents generated for them.

pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;

pub use connection::{DatabaseConnection, DatabasePool};
pub use error::{DatabaseError, DbResult};
pub use models::{Document, NewDocument, NewTask, Task, TaskWithDocuments};
pub use repositories::{DocumentRepository, TaskRepository};
