//! Oracle backend abstraction
//!
//! Every concrete oracle (the OpenAI-compatible HTTP client, the in-memory mock)
//! implements [`OracleBackend`] so the review pipeline can be driven without
//! knowing which transport answers it.

use async_trait::async_trait;

use super::error::BackendError;
use super::types::{CompletionRequest, CompletionResponse};

/// A text-completion service: prompt in, completion text or error out
#[async_trait]
pub trait OracleBackend: Send + Sync {
    /// Sends one request and waits for the completion
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the transport fails, the service answers with a
    /// non-success status, or the response carries no usable choice.
    async fn complete(&self, request: CompletionRequest)
        -> Result<CompletionResponse, BackendError>;

    /// Returns the human-readable name of this backend
    fn name(&self) -> &str;

    /// Returns optional model information for this backend
    fn model_info(&self) -> Option<String> {
        None
    }
}
