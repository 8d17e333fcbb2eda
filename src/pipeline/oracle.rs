use super::analysis::AnalysisResult;
use crate::ai::{CompletionRequest, OracleBackend, PromptBuilder};
use std::sync::Arc;
use tracing::{debug, warn};

/// Reviews one unit of text through an [`OracleBackend`]
///
/// Backend errors never escape: they become [`AnalysisResult::Failure`] so
/// results already gathered for other units survive.
#[derive(Clone)]
pub struct OracleClient {
    backend: Arc<dyn OracleBackend>,
    prompts: PromptBuilder,
    max_tokens: u32,
    temperature: f32,
}

impl OracleClient {
    pub fn new(
        backend: Arc<dyn OracleBackend>,
        prompts: PromptBuilder,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            backend,
            prompts,
            max_tokens,
            temperature,
        }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub async fn analyze(&self, content: &str) -> AnalysisResult {
        let request = CompletionRequest::new(self.prompts.build_messages(content))
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);

        match self.backend.complete(request).await {
            Ok(response) => {
                debug!(
                    backend = self.backend.name(),
                    chars = response.content.len(),
                    response_time_ms = response.response_time.as_millis(),
                    "Oracle answered"
                );
                AnalysisResult::Success(response.content)
            }
            Err(e) => {
                warn!(backend = self.backend.name(), error = %e, "Oracle request failed");
                AnalysisResult::Failure(format!("Oracle request failed: {}", e))
            }
        }
    }
}

impl std::fmt::Debug for OracleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleClient")
            .field("backend", &self.backend.name())
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{BackendError, MessageRole, MockOracle, MockResponse};

    fn client(oracle: Arc<MockOracle>) -> OracleClient {
        OracleClient::new(oracle, PromptBuilder::new("English"), 1024, 0.3)
    }

    #[tokio::test]
    async fn test_success_passes_text_through() {
        let oracle = Arc::new(MockOracle::new());
        oracle.add_response(MockResponse::text("1. Unused import"));

        let result = client(oracle.clone()).analyze("import os").await;

        assert_eq!(result, AnalysisResult::Success("1. Unused import".to_string()));

        let request = &oracle.requests()[0];
        assert_eq!(request.max_tokens, Some(1024));
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert!(request.messages[1].content.ends_with("import os"));
    }

    #[tokio::test]
    async fn test_failure_becomes_content() {
        let oracle = Arc::new(MockOracle::new());
        oracle.add_response(MockResponse::error(BackendError::NetworkError {
            message: "connection refused".to_string(),
        }));

        let result = client(oracle).analyze("x").await;

        match result {
            AnalysisResult::Failure(message) => {
                assert!(message.starts_with("Oracle request failed: "));
                assert!(message.contains("connection refused"));
            }
            other => panic!("Expected failure, got {:?}", other),
        }
    }
}
