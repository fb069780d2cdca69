//! HTTP client for the execution stream
//!
//! Opens `POST /api/execute-task` on an hrdocs server and hands the body to an
//! [`ExecutionSession`](crate::stream::ExecutionSession) for reassembly.

pub mod execution;

pub use execution::ExecutionClient;
