//! OpenAI-compatible HTTP client for the review oracle
//!
//! The oracle speaks the chat-completions dialect: a bearer credential, a model
//! identifier, an ordered list of `{role, content}` turns, `max_tokens` and
//! `temperature`. The answer is read from `choices[0].message.content`.
//!
//! # Example
//!
//! ```no_run
//! use reviewbox::ai::{ChatMessage, CompletionRequest, OpenAICompatibleClient, OracleBackend};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAICompatibleClient::with_timeout(
//!     "http://localhost:8000/v1/chat/completions".to_string(),
//!     "secret".to_string(),
//!     "mistral-nemo-instruct-2407".to_string(),
//!     Duration::from_secs(60),
//! )?;
//!
//! let request = CompletionRequest::new(vec![ChatMessage::user("Review: fn main() {}")]);
//! let response = client.complete(request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

use crate::ai::backend::OracleBackend;
use crate::ai::error::BackendError;
use crate::ai::types::{ChatMessage, CompletionRequest, CompletionResponse};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Default request timeout for API calls
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Chat-completions client for OpenAI-compatible endpoints
///
/// The endpoint is the full completions URL; nothing is appended to it.
/// The client is cheap to share behind an `Arc`.
pub struct OpenAICompatibleClient {
    /// Full chat-completions URL
    endpoint: String,

    /// Bearer credential sent with every request
    api_key: String,

    /// Model name to use for inference
    model: String,

    /// Shared HTTP client with connection pooling
    http_client: Client,

    /// Request timeout duration
    timeout: Duration,
}

impl OpenAICompatibleClient {
    /// Creates a client with the default timeout
    pub fn new(endpoint: String, api_key: String, model: String) -> Result<Self, BackendError> {
        Self::with_timeout(
            endpoint,
            api_key,
            model,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Creates a client with a custom transport timeout
    ///
    /// # Errors
    ///
    /// Returns `BackendError::ConfigurationError` if the endpoint is empty or the
    /// HTTP client cannot be built.
    pub fn with_timeout(
        endpoint: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        if endpoint.trim().is_empty() {
            return Err(BackendError::ConfigurationError {
                message: "Oracle endpoint is empty".to_string(),
            });
        }

        let http_client = Client::builder().timeout(timeout).build().map_err(|e| {
            BackendError::ConfigurationError {
                message: format!("Failed to build HTTP client: {}", e),
            }
        })?;

        Ok(Self {
            endpoint,
            api_key,
            model,
            http_client,
            timeout,
        })
    }

    fn build_request(&self, request: CompletionRequest) -> OpenAIRequest {
        OpenAIRequest {
            model: self.model.clone(),
            messages: request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: Some(false),
        }
    }

    fn map_transport_error(&self, e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            error!("Oracle request timed out after {:?}", self.timeout);
            BackendError::TimeoutError {
                seconds: self.timeout.as_secs(),
            }
        } else if e.is_connect() {
            error!("Cannot connect to oracle at {}", self.endpoint);
            BackendError::NetworkError {
                message: format!("Connection failed: {}", e),
            }
        } else {
            error!("Oracle request error: {}", e);
            BackendError::NetworkError {
                message: format!("Request failed: {}", e),
            }
        }
    }
}

#[async_trait]
impl OracleBackend for OpenAICompatibleClient {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, BackendError> {
        let body = self.build_request(request);

        debug!(
            model = %self.model,
            turns = body.messages.len(),
            prompt_length = body.messages.last().map(|m| m.content.len()).unwrap_or(0),
            "Sending request to oracle"
        );

        let start = Instant::now();

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let elapsed = start.elapsed();
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("Oracle returned error status {}: {}", status, text);

            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(BackendError::AuthenticationError {
                    message: format!("HTTP {}", status),
                });
            }

            return Err(BackendError::ApiError {
                message: format!("HTTP {}: {}", status, text),
                status_code: Some(status.as_u16()),
            });
        }

        let raw = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let api_response: OpenAIResponse = serde_json::from_str(&raw).map_err(|e| {
            error!("Failed to parse oracle response: {}", e);
            BackendError::InvalidResponse {
                message: format!("JSON parse error: {}", e),
                raw_response: Some(raw.chars().take(200).collect()),
            }
        })?;

        info!(
            "Oracle completion finished in {:.2}s",
            elapsed.as_secs_f64()
        );

        if let Some(usage) = &api_response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Oracle token usage"
            );
        }

        let content = extract_content(api_response)?;
        Ok(CompletionResponse::text(content, elapsed))
    }

    fn name(&self) -> &str {
        "openai-compatible"
    }

    fn model_info(&self) -> Option<String> {
        Some(format!("{} @ {}", self.model, self.endpoint))
    }
}

fn extract_content(response: OpenAIResponse) -> Result<String, BackendError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| BackendError::InvalidResponse {
            message: "No content in oracle response".to_string(),
            raw_response: None,
        })
}

impl fmt::Debug for OpenAICompatibleClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAICompatibleClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Request structure for the chat completions API
#[derive(Debug, Clone, Serialize)]
struct OpenAIRequest {
    /// Model identifier
    model: String,
    /// Ordered conversation turns
    messages: Vec<ChatMessage>,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Response structure from the chat completions API
#[derive(Debug, Clone, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn client(endpoint: String) -> OpenAICompatibleClient {
        OpenAICompatibleClient::with_timeout(
            endpoint,
            "test-key".to_string(),
            "test-model".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    /// Serves exactly one HTTP exchange and returns the raw request it received
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];

            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);

                let text = String::from_utf8_lossy(&buf).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let lower = line.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                        })
                        .unwrap_or(0);
                    if buf.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8_lossy(&buf).to_string()
        });

        (format!("http://{}/v1/chat/completions", addr), handle)
    }

    fn review_request() -> CompletionRequest {
        CompletionRequest::new(vec![
            ChatMessage::system("Respond in English."),
            ChatMessage::user("Review: print('hi')"),
        ])
        .with_max_tokens(1024)
        .with_temperature(0.3)
    }

    #[test]
    fn test_client_creation() {
        let client = client("http://localhost:8000/v1/chat/completions".to_string());
        assert_eq!(client.name(), "openai-compatible");
        let info = client.model_info().unwrap();
        assert!(info.contains("test-model"));
        assert!(info.contains("localhost:8000"));
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        let result = OpenAICompatibleClient::new(
            "  ".to_string(),
            "key".to_string(),
            "model".to_string(),
        );
        assert!(matches!(
            result,
            Err(BackendError::ConfigurationError { .. })
        ));
    }

    #[test]
    fn test_request_serialization() {
        let client = client("http://localhost:8000/v1/chat/completions".to_string());
        let body = client.build_request(review_request());

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "test-model");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 1024);
        assert!((json["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_response_parsing() {
        let response_json = r#"{
            "id": "test-id",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "finish_reason": "stop",
                "message": {"role": "assistant", "content": "1. Missing docstring"}
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;

        let response: OpenAIResponse = serde_json::from_str(response_json).unwrap();
        assert_eq!(response.usage.as_ref().unwrap().prompt_tokens, 10);
        assert_eq!(extract_content(response).unwrap(), "1. Missing docstring");
    }

    #[test]
    fn test_missing_choice_is_extraction_failure() {
        let response: OpenAIResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            extract_content(response),
            Err(BackendError::InvalidResponse { .. })
        ));

        let response: OpenAIResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(extract_content(response).is_err());
    }

    #[tokio::test]
    async fn test_complete_against_local_server() {
        let (endpoint, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"No issues found"}}]}"#,
        )
        .await;

        let response = client(endpoint).complete(review_request()).await.unwrap();
        assert_eq!(response.content, "No issues found");

        let raw_request = server.await.unwrap();
        assert!(raw_request.starts_with("POST /v1/chat/completions"));
        assert!(raw_request
            .to_ascii_lowercase()
            .contains("authorization: bearer test-key"));
        assert!(raw_request.contains("Review: print('hi')"));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_api_error() {
        let (endpoint, server) =
            serve_once("HTTP/1.1 500 Internal Server Error", r#"{"error":"boom"}"#).await;

        let result = client(endpoint).complete(review_request()).await;
        match result {
            Err(BackendError::ApiError { status_code, .. }) => {
                assert_eq!(status_code, Some(500))
            }
            other => panic!("Expected ApiError, got {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authentication_error() {
        let (endpoint, server) = serve_once("HTTP/1.1 401 Unauthorized", "{}").await;

        let result = client(endpoint).complete(review_request()).await;
        assert!(matches!(
            result,
            Err(BackendError::AuthenticationError { .. })
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_body_maps_to_invalid_response() {
        let (endpoint, server) = serve_once("HTTP/1.1 200 OK", "not json").await;

        let result = client(endpoint).complete(review_request()).await;
        match result {
            Err(BackendError::InvalidResponse { raw_response, .. }) => {
                assert_eq!(raw_response.as_deref(), Some("not json"))
            }
            other => panic!("Expected InvalidResponse, got {:?}", other),
        }
        server.await.unwrap();
    }

    #[test]
    fn test_debug_impl_hides_key() {
        let client = client("http://localhost:8000/v1/chat/completions".to_string());
        let debug_str = format!("{:?}", client);
        assert!(debug_str.contains("OpenAICompatibleClient"));
        assert!(!debug_str.contains("test-key"));
    }
}
