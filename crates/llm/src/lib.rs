//! DraftCheck LLM
//!
//! Provides a provider-neutral interface for issuing single-shot generation
//! requests to a remote generative-text service:
//! - Plain text and multimodal (inline base64 data) prompts
//! - Schema-constrained JSON responses
//! - Retrieval-augmented (search-grounded) responses with citations
//!
//! Ships the Gemini provider and the HTTP client factory.

pub mod gemini;
pub mod http_client;
pub mod provider;
pub mod types;

// Re-export main types
pub use gemini::GeminiProvider;
pub use http_client::build_http_client;
pub use provider::LlmProvider;
pub use types::*;
