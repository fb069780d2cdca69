//! Configuration for hrdocs-server
//!
//! - Server, database, model, generation and email settings (TOML)
//! - Prompt templates with per-entry overrides

pub mod prompts;
pub mod server;

pub use prompts::{render, PromptOverrides, PromptTemplates};
pub use server::{
    DatabaseConfig, EmailConfig, GenerationConfig, LlmSettings, ServerConfig, ServerConfigError,
    ServerInfoConfig,
};
