//! Streamed task execution
//!
//! Server half of the execution stream: asks the streaming model to "perform"
//! a task and turns its text deltas into wire frames.

pub mod service;

pub use service::{encode_frames, FrameStream, TaskExecutionService};
