//! Oracle integrations
//!
//! This module provides the [`OracleBackend`] abstraction over the external
//! text-completion service, the OpenAI-compatible HTTP implementation, a scripted
//! mock for tests, and the review prompt builder.

pub mod backend;
pub mod error;
mod mock;
pub mod openai_compatible;
pub mod prompt;
pub mod types;

pub use backend::OracleBackend;
pub use error::BackendError;
pub use mock::{MockOracle, MockResponse};
pub use openai_compatible::OpenAICompatibleClient;
pub use prompt::PromptBuilder;
pub use types::{ChatMessage, CompletionRequest, CompletionResponse, MessageRole};
