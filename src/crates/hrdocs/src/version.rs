//! Crate version, reported by `/health`

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
