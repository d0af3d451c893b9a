//! LLM Types
//!
//! Core types for generative-model provider interactions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Configuration for an LLM provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key. A missing key is only reported when a request is made.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL override (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Model name to use
    pub model: String,
    /// Maximum tokens to generate (provider default when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Default sampling temperature (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_temperature() -> f32 {
    0.2
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
            max_output_tokens: None,
            temperature: default_temperature(),
        }
    }
}

/// Role of a content turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentRole {
    User,
    Model,
}

/// A single piece of a content turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    /// Plain text
    Text { text: String },
    /// Binary payload, already base64 encoded
    InlineData { mime_type: String, data: String },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Part::InlineData {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

/// One turn of the conversation sent to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: ContentRole,
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a user turn holding a single text part
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: ContentRole::User,
            parts: vec![Part::text(text)],
        }
    }

    /// Create a user turn from arbitrary parts
    pub fn user_parts(parts: Vec<Part>) -> Self {
        Self {
            role: ContentRole::User,
            parts,
        }
    }
}

/// Primitive kinds understood by the response-schema dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
}

/// Schema constraining a JSON-mode response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, ResponseSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ResponseSchema>>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

impl ResponseSchema {
    fn primitive(schema_type: SchemaType, description: Option<&str>) -> Self {
        Self {
            schema_type,
            description: description.map(|s| s.to_string()),
            properties: None,
            required: None,
            items: None,
            enum_values: None,
        }
    }

    /// Create a string schema
    pub fn string(description: Option<&str>) -> Self {
        Self::primitive(SchemaType::String, description)
    }

    /// Create a number schema
    pub fn number(description: Option<&str>) -> Self {
        Self::primitive(SchemaType::Number, description)
    }

    /// Create an integer schema
    pub fn integer(description: Option<&str>) -> Self {
        Self::primitive(SchemaType::Integer, description)
    }

    /// Create a string schema restricted to a fixed set of values
    pub fn string_enum(description: Option<&str>, values: &[&str]) -> Self {
        Self {
            enum_values: Some(values.iter().map(|v| v.to_string()).collect()),
            ..Self::string(description)
        }
    }

    /// Create an object schema; every listed property is required
    pub fn object(description: Option<&str>, properties: Vec<(&str, ResponseSchema)>) -> Self {
        let required = properties.iter().map(|(name, _)| name.to_string()).collect();
        let properties = properties
            .into_iter()
            .map(|(name, schema)| (name.to_string(), schema))
            .collect();
        Self {
            properties: Some(properties),
            required: Some(required),
            ..Self::primitive(SchemaType::Object, description)
        }
    }

    /// Create an array schema
    pub fn array(description: Option<&str>, items: ResponseSchema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::primitive(SchemaType::Array, description)
        }
    }

    /// Mark a property as optional (drop it from `required`)
    pub fn optional(mut self, property: &str) -> Self {
        if let Some(required) = self.required.as_mut() {
            required.retain(|name| name != property);
        }
        self
    }
}

/// A single generation request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Conversation turns (usually a single user turn)
    pub contents: Vec<Content>,
    /// Optional system instruction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    /// When set, the response is JSON constrained to this schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<ResponseSchema>,
    /// Enable search grounding; citations are returned on the response
    #[serde(default)]
    pub grounding: bool,
    /// Temperature override for this request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    /// Create a request from a single user prompt
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::user_text(prompt)],
            ..Default::default()
        }
    }

    /// Create a request from a single multi-part user turn
    pub fn parts(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content::user_parts(parts)],
            ..Default::default()
        }
    }

    pub fn with_system(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_schema(mut self, schema: ResponseSchema) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_grounding(mut self) -> Self {
        self.grounding = true;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Total characters of text across all parts (for logging)
    pub fn text_len(&self) -> usize {
        self.contents
            .iter()
            .flat_map(|c| c.parts.iter())
            .map(|p| match p {
                Part::Text { text } => text.len(),
                Part::InlineData { .. } => 0,
            })
            .sum()
    }
}

/// A web source the model grounded its answer on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingCitation {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageStats {
    /// Number of input/prompt tokens
    pub input_tokens: u32,
    /// Number of output/candidate tokens
    pub output_tokens: u32,
}

impl UsageStats {
    /// Total tokens used
    pub fn total_tokens(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of response
    Stop,
    /// Hit max tokens limit
    MaxTokens,
    /// Blocked by safety filters
    Safety,
    /// Blocked for reciting training data
    Recitation,
    /// Other/unknown reason
    Other(String),
}

impl From<&str> for FinishReason {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "STOP" | "FINISH_REASON_STOP" => FinishReason::Stop,
            "MAX_TOKENS" => FinishReason::MaxTokens,
            "SAFETY" | "BLOCKLIST" | "PROHIBITED_CONTENT" => FinishReason::Safety,
            "RECITATION" => FinishReason::Recitation,
            other => FinishReason::Other(other.to_string()),
        }
    }
}

/// Response from an LLM provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Text content of the response (None when the model produced no text)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Grounding citations in the order the provider returned them
    #[serde(default)]
    pub citations: Vec<GroundingCitation>,
    /// Why the response ended
    pub finish_reason: FinishReason,
    /// Token usage statistics
    pub usage: UsageStats,
    /// The model that generated the response
    pub model: String,
}

impl LlmResponse {
    /// Text content, or the empty string
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Whether the response carries any non-blank text
    pub fn has_text(&self) -> bool {
        self.content
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Error types for LLM operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LlmError {
    /// Authentication failed (missing or invalid API key)
    AuthenticationFailed { message: String },
    /// Rate limit exceeded
    RateLimited {
        message: String,
        retry_after: Option<u32>,
    },
    /// Model not found or not available
    ModelNotFound { model: String },
    /// Invalid request (bad parameters)
    InvalidRequest { message: String },
    /// Server error from the provider
    ServerError {
        message: String,
        status: Option<u16>,
    },
    /// Network/connection error (including timeouts)
    NetworkError { message: String },
    /// Response envelope could not be decoded
    ParseError { message: String },
    /// Other error
    Other { message: String },
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmError::AuthenticationFailed { message } => {
                write!(f, "Authentication failed: {}", message)
            }
            LlmError::RateLimited { message, .. } => {
                write!(f, "Rate limited: {}", message)
            }
            LlmError::ModelNotFound { model } => {
                write!(f, "Model not found: {}", model)
            }
            LlmError::InvalidRequest { message } => {
                write!(f, "Invalid request: {}", message)
            }
            LlmError::ServerError { message, status } => {
                if let Some(s) = status {
                    write!(f, "Server error ({}): {}", s, message)
                } else {
                    write!(f, "Server error: {}", message)
                }
            }
            LlmError::NetworkError { message } => {
                write!(f, "Network error: {}", message)
            }
            LlmError::ParseError { message } => {
                write!(f, "Parse error: {}", message)
            }
            LlmError::Other { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for LlmError {}

/// Result type for LLM operations
pub type LlmResult<T> = Result<T, LlmError>;
