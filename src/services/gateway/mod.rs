//! Model Gateway
//!
//! Thin adapter between the session and the generative-model service. Each
//! operation builds one request, sends it through an [`LlmProvider`] and
//! turns the answer into a typed result.
//!
//! Two failure classes are handled differently:
//! - a missing credential or a transport/service failure propagates as an
//!   [`LlmError`];
//! - a response that arrives but cannot be read is logged and replaced by an
//!   empty or fallback value (grammar, claims, AI detection).

mod parse;
mod prompts;

use std::sync::Arc;

use draftcheck_core::truncate_chars;
use draftcheck_llm::{GenerationRequest, LlmProvider, LlmResult, Part};

use crate::models::analysis::{AiDetectionResult, SourceMatch, Suggestion, VerificationResult};
use crate::models::settings::AppConfig;

pub use parse::{
    dedupe_sources, parse_ai_detection, parse_claims, parse_suggestions, sources_from_citations,
    strip_code_fence, ParseIssue,
};

/// Returned by `generate_summary` when the service produces no text
pub const SUMMARY_FALLBACK: &str = "Could not generate summary.";

/// Request-size bounds applied before text leaves the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewaySettings {
    pub source_prefix_chars: usize,
    pub ai_detection_prefix_chars: usize,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for GatewaySettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            source_prefix_chars: config.source_prefix_chars,
            ai_detection_prefix_chars: config.ai_detection_prefix_chars,
        }
    }
}

/// Timestamp used to make ids unique across batches
fn id_stamp() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub struct ModelGateway {
    provider: Arc<dyn LlmProvider>,
    settings: GatewaySettings,
}

impl ModelGateway {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: GatewaySettings) -> Self {
        Self { provider, settings }
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn settings(&self) -> GatewaySettings {
        self.settings
    }

    /// Grammar, spelling, style and clarity corrections for `text`.
    pub async fn check_grammar_and_style(&self, text: &str) -> LlmResult<Vec<Suggestion>> {
        let request = GenerationRequest::text(prompts::grammar_prompt(text))
            .with_system(prompts::EDITOR_SYSTEM_PROMPT)
            .with_schema(prompts::suggestions_schema());
        let response = self.provider.generate(request).await?;

        match parse_suggestions(response.text(), id_stamp()) {
            Ok(suggestions) => {
                tracing::debug!(count = suggestions.len(), "Parsed grammar suggestions");
                Ok(suggestions)
            }
            Err(issue) => {
                tracing::warn!(%issue, "Discarding unreadable grammar response");
                Ok(Vec::new())
            }
        }
    }

    /// Web sources for the opening of `text`, deduplicated by URL.
    pub async fn verify_sources(&self, text: &str) -> LlmResult<Vec<SourceMatch>> {
        let prefix = truncate_chars(text, self.settings.source_prefix_chars);
        let request = GenerationRequest::text(prompts::sources_prompt(prefix)).with_grounding();
        let response = self.provider.generate(request).await?;

        let sources = sources_from_citations(&response.citations);
        tracing::debug!(
            citations = response.citations.len(),
            sources = sources.len(),
            "Collected grounding sources"
        );
        Ok(sources)
    }

    /// Fact-check each claim in `text` against a web search.
    pub async fn verify_text_claims(&self, text: &str) -> LlmResult<Vec<VerificationResult>> {
        let request = GenerationRequest::text(prompts::claims_prompt(text))
            .with_system(prompts::EDITOR_SYSTEM_PROMPT)
            .with_schema(prompts::claims_schema())
            .with_grounding();
        let response = self.provider.generate(request).await?;

        match parse_claims(response.text(), id_stamp()) {
            Ok(claims) => Ok(claims),
            Err(issue) => {
                tracing::warn!(%issue, "Discarding unreadable claim verification response");
                Ok(Vec::new())
            }
        }
    }

    pub async fn generate_summary(&self, text: &str) -> LlmResult<String> {
        let request = GenerationRequest::text(prompts::summary_prompt(text));
        let response = self.provider.generate(request).await?;

        let summary = response.text().trim();
        if summary.is_empty() {
            tracing::warn!(finish_reason = ?response.finish_reason, "Summary came back empty");
            return Ok(SUMMARY_FALLBACK.to_string());
        }
        Ok(summary.to_string())
    }

    /// Likelihood that the opening of `text` was machine-written.
    pub async fn detect_ai_content(&self, text: &str) -> LlmResult<AiDetectionResult> {
        let prefix = truncate_chars(text, self.settings.ai_detection_prefix_chars);
        let request = GenerationRequest::text(prompts::ai_detection_prompt(prefix))
            .with_schema(prompts::ai_detection_schema());
        let response = self.provider.generate(request).await?;

        match parse_ai_detection(response.text()) {
            Ok(result) => Ok(result),
            Err(issue) => {
                tracing::warn!(%issue, "Falling back on unreadable AI detection response");
                Ok(AiDetectionResult::fallback())
            }
        }
    }

    /// Verbatim transcription of a base64-encoded file.
    ///
    /// Returns an empty string when the service produces no text.
    pub async fn extract_text_from_file(&self, data: &str, mime_type: &str) -> LlmResult<String> {
        let request = GenerationRequest::parts(vec![
            Part::inline_data(mime_type, data),
            Part::text(prompts::TRANSCRIBE_PROMPT),
        ])
        .with_temperature(0.0);
        let response = self.provider.generate(request).await?;
        Ok(response.content.unwrap_or_default())
    }

    pub async fn health_check(&self) -> LlmResult<()> {
        self.provider.health_check().await
    }
}
