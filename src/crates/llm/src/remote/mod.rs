//! Remote generation providers.
//!
//! Providers speaking the OpenAI chat completions protocol are served by
//! [`OpenAiClient`]; point `base_url` at the compatible endpoint.

pub mod openai;

pub use openai::OpenAiClient;
