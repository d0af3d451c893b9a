//! Response Types
//!
//! Standard response envelope for every command handler.

use serde::{Deserialize, Serialize};

/// Generic command response for all commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResponse<T> {
    /// Create a successful response with data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response with message
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl<T> From<Result<T, crate::utils::error::AppError>> for CommandResponse<T> {
    fn from(result: Result<T, crate::utils::error::AppError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
    pub model: String,
    pub credential: bool,
    pub model_service: bool,
    pub config: bool,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            service: "draftcheck".to_string(),
            model: String::new(),
            credential: false,
            model_service: false,
            config: false,
        }
    }
}

/// Where the Gemini credential was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    /// Passed on the command line or set programmatically
    Explicit,
    Environment,
    Keyring,
    Missing,
}

/// Credential status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatus {
    pub source: CredentialSource,
    /// Last four characters of the key, if any
    pub hint: Option<String>,
}
