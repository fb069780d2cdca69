//! API route definitions

use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::api::{handlers, middleware};
use crate::breakdown::BreakdownPlanner;
use crate::db::DatabaseConnection;
use crate::execution::TaskExecutionService;
use crate::lifecycle::DocumentOrchestrator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub orchestrator: DocumentOrchestrator,
    pub executor: Arc<TaskExecutionService>,
    pub planner: Arc<BreakdownPlanner>,
}

/// Build the complete API router
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Task endpoints
        .route(
            "/api/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/api/tasks/:id",
            patch(handlers::update_task_status).delete(handlers::delete_task),
        )
        .route("/api/tasks/:id/generate", post(handlers::generate_document))
        // Execution and planning
        .route("/api/execute-task", post(handlers::execute_task))
        .route("/api/generate-tasks", post(handlers::generate_tasks))
        .layer(middleware::logging_layer())
        .layer(middleware::cors_layer())
        .with_state(app_state)
}
