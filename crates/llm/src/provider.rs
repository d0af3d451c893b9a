//! LLM Provider Trait
//!
//! Defines the common interface for all generative-model providers.

use async_trait::async_trait;

use super::types::{GenerationRequest, LlmError, LlmResponse, LlmResult, ProviderConfig};

/// Trait that all LLM providers must implement.
///
/// Provides a unified interface for:
/// - Single-shot generation (generate)
/// - Health checking
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Returns the provider name for identification.
    fn name(&self) -> &'static str;

    /// Returns the current model being used.
    fn model(&self) -> &str;

    /// Returns whether this provider can ground answers on web search.
    fn supports_grounding(&self) -> bool {
        false
    }

    /// Returns whether this provider accepts inline binary parts.
    fn supports_multimodal(&self) -> bool {
        false
    }

    /// Send a request and get a complete response.
    ///
    /// Transport failures, non-success statuses and a missing credential
    /// are errors. A well-formed response with no text is not.
    async fn generate(&self, request: GenerationRequest) -> LlmResult<LlmResponse>;

    /// Check if the provider is reachable and the API key is accepted.
    async fn health_check(&self) -> LlmResult<()>;

    /// Get the configuration for this provider.
    fn config(&self) -> &ProviderConfig;
}

/// Helper function to create an error for missing API key
pub fn missing_api_key_error(provider: &str) -> LlmError {
    LlmError::AuthenticationFailed {
        message: format!("API key not configured for {}", provider),
    }
}

/// Pull the human-readable message out of a `{"error": {"message": ...}}` body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(|s| s.to_string()))
        .unwrap_or_else(|| body.to_string())
}

/// Helper function to parse HTTP error status codes
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> LlmError {
    let message = error_message(body);
    match status {
        401 => LlmError::AuthenticationFailed {
            message: format!("{}: Invalid API key", provider),
        },
        403 => LlmError::AuthenticationFailed {
            message: format!("{}: Access denied", provider),
        },
        404 => LlmError::ModelNotFound { model: message },
        429 => LlmError::RateLimited {
            message,
            retry_after: None,
        },
        400 => LlmError::InvalidRequest { message },
        500..=599 => LlmError::ServerError {
            message,
            status: Some(status),
        },
        _ => LlmError::Other {
            message: format!("HTTP {}: {}", status, message),
        },
    }
}
