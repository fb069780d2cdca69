//! Repository pattern implementations for database access

pub mod document_repo;
pub mod task_repo;

pub use document_repo::DocumentRepository;
pub use task_repo::TaskRepository;
