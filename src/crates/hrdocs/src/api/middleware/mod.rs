//! API middleware layer
//!
//! CORS, request tracing and request field validation.

pub mod cors;
pub mod logging;
pub mod validation;

pub use cors::cors_layer;
pub use logging::logging_layer;
pub use validation::{require_text, validate_string_length};
