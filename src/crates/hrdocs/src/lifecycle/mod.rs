//! Task lifecycle orchestration
//!
//! Drives one task through `in_progress`, document generation, the atomic
//! `completed` + document write, and an optional email. Failures before the
//! commit are compensated so the task never keeps a half-finished state.

pub mod error;
pub mod orchestrator;
pub mod saga;

pub use error::LifecycleError;
pub use orchestrator::{DocumentOrchestrator, GenerationOutcome};
pub use saga::{GenerationSaga, SagaStep};
