//! Shared test utilities for gateway, orchestrator and session unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use draftcheck_llm::{
    FinishReason, GenerationRequest, GroundingCitation, LlmError, LlmProvider, LlmResponse,
    LlmResult, Part, ProviderConfig, SchemaType, UsageStats,
};

/// Canned answer for one request kind
#[derive(Debug, Clone, Default)]
struct Script {
    text: Option<String>,
    citations: Vec<GroundingCitation>,
    fail: bool,
    delay: Option<Duration>,
}

/// In-process provider that answers each gateway operation from a script
/// and records every request it receives.
///
/// Requests are told apart by shape: inline data is a transcription,
/// grounding plus schema is claim verification, grounding alone is source
/// verification, an array schema is grammar, an object schema is AI
/// detection, and a plain prompt is a summary.
#[derive(Default)]
pub(crate) struct ScriptedProvider {
    config: ProviderConfig,
    scripts: HashMap<&'static str, Script>,
    requests: Mutex<Vec<(&'static str, GenerationRequest)>>,
}

pub(crate) fn classify(request: &GenerationRequest) -> &'static str {
    let has_inline = request
        .contents
        .iter()
        .flat_map(|c| c.parts.iter())
        .any(|p| matches!(p, Part::InlineData { .. }));
    if has_inline {
        return "transcribe";
    }
    match (&request.response_schema, request.grounding) {
        (Some(_), true) => "claims",
        (None, true) => "sources",
        (Some(schema), false) if schema.schema_type == SchemaType::Array => "grammar",
        (Some(_), false) => "ai",
        (None, false) => "summary",
    }
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn script(mut self, kind: &'static str, update: impl FnOnce(&mut Script)) -> Self {
        update(self.scripts.entry(kind).or_default());
        self
    }

    pub(crate) fn with_grammar(self, json: &str) -> Self {
        let json = json.to_string();
        self.script("grammar", |s| s.text = Some(json))
    }

    pub(crate) fn with_sources(self, citations: Vec<GroundingCitation>) -> Self {
        self.script("sources", |s| {
            s.text = Some("Sources found.".to_string());
            s.citations = citations;
        })
    }

    pub(crate) fn with_claims(self, json: &str) -> Self {
        let json = json.to_string();
        self.script("claims", |s| s.text = Some(json))
    }

    pub(crate) fn with_summary(self, text: &str) -> Self {
        let text = text.to_string();
        self.script("summary", |s| s.text = Some(text))
    }

    pub(crate) fn with_ai_detection(self, json: &str) -> Self {
        let json = json.to_string();
        self.script("ai", |s| s.text = Some(json))
    }

    pub(crate) fn with_transcript(self, text: &str) -> Self {
        let text = text.to_string();
        self.script("transcribe", |s| s.text = Some(text))
    }

    /// Answer `kind` with a 500
    pub(crate) fn failing(self, kind: &'static str) -> Self {
        self.script(kind, |s| s.fail = true)
    }

    /// Hold the answer for `kind` back by `delay`
    pub(crate) fn delayed(self, kind: &'static str, delay: Duration) -> Self {
        self.script(kind, |s| s.delay = Some(delay))
    }

    /// Preset answers for every full-scan operation
    pub(crate) fn full_scan(ai_score: u8, suggestion_count: usize, source_count: usize) -> Self {
        let suggestions: Vec<String> = (0..suggestion_count)
            .map(|i| {
                format!(
                    r#"{{"originalText": "word{i}", "suggestedText": "term{i}",
                        "explanation": "fix", "type": "Grammar", "severity": "Minor"}}"#
                )
            })
            .collect();
        let citations = (0..source_count)
            .map(|i| GroundingCitation {
                uri: format!("https://source{}.example", i),
                title: Some(format!("Source {}", i)),
            })
            .collect();
        Self::new()
            .with_grammar(&format!("[{}]", suggestions.join(",")))
            .with_sources(citations)
            .with_summary("A short summary.")
            .with_ai_detection(&format!(
                r#"{{"score": {}, "label": "Mixed Signals", "explanation": "scripted"}}"#,
                ai_score
            ))
    }

    pub(crate) fn calls(&self, kind: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn last_request(&self, kind: &str) -> Option<GenerationRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(k, _)| *k == kind)
            .map(|(_, r)| r.clone())
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, request: GenerationRequest) -> LlmResult<LlmResponse> {
        let kind = classify(&request);
        self.requests.lock().unwrap().push((kind, request));
        let script = self.scripts.get(kind).cloned().unwrap_or_default();

        if let Some(delay) = script.delay {
            tokio::time::sleep(delay).await;
        }
        if script.fail {
            return Err(LlmError::ServerError {
                message: format!("scripted failure for {}", kind),
                status: Some(500),
            });
        }
        Ok(LlmResponse {
            content: script.text,
            citations: script.citations,
            finish_reason: FinishReason::Stop,
            usage: UsageStats::default(),
            model: self.config.model.clone(),
        })
    }

    async fn health_check(&self) -> LlmResult<()> {
        Ok(())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}
