//! REST API layer for hrdocs-server
//!
//! Provides HTTP endpoints for:
//! - Task CRUD and document generation
//! - Streamed task execution
//! - Goal breakdown
//! - Health

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use middleware::cors_layer;
pub use routes::{create_router, AppState};
