//! Text-generation clients for hrdocs.
//!
//! Two leaf capabilities are exposed as traits:
//!
//! - [`StructuredModel`]: one request, one JSON object constrained by an
//!   [`OutputSchema`]. [`generate_as`] validates and deserializes the result.
//! - [`StreamingModel`]: one request, a finite [`TextStream`] of text deltas.
//!
//! [`remote::OpenAiClient`] implements both against any OpenAI-compatible
//! `/chat/completions` endpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use llm::remote::OpenAiClient;
//! use llm::{RemoteLlmConfig, StreamingModel};
//!
//! let config = RemoteLlmConfig::from_env("OPENAI_API_KEY", "https://api.openai.com/v1", "gpt-4o-mini")?;
//! let client = OpenAiClient::new(config)?;
//!
//! let mut stream = client.stream_text("List three onboarding steps").await?;
//! while let Some(delta) = stream.next().await {
//!     print!("{}", delta?);
//! }
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod remote;
pub mod schema;
pub mod sse;

pub use config::RemoteLlmConfig;
pub use error::{LlmError, Result};
pub use model::{generate_as, StreamingModel, StructuredModel, TextStream};
pub use schema::{Field, FieldKind, OutputSchema};
