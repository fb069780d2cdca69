//! API endpoint handlers

pub mod breakdown;
pub mod documents;
pub mod execution;
pub mod health;
pub mod tasks;

pub use breakdown::generate_tasks;
pub use documents::generate_document;
pub use execution::execute_task;
pub use health::health;
pub use tasks::{create_task, delete_task, list_tasks, update_task_status};
