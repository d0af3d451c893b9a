//! Shared fixtures: a mock Gemini endpoint and an `AppState` pointed at it.

use draftcheck::commands;
use draftcheck::{AppState, SettingsUpdate};
use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::{json, Value};
use tempfile::TempDir;

pub const MODEL: &str = "gemini-test";
pub const ENDPOINT: &str = "/models/gemini-test:generateContent";

/// Phrases that tell the six request kinds apart in a request body
pub const GRAMMAR: &str = "for grammar, spelling";
pub const SOURCES: &str = "Search the web for reliable sources";
pub const CLAIMS: &str = "Identify each distinct factual claim";
pub const SUMMARY: &str = "Summarize the following text";
pub const AI_DETECTION: &str = "Estimate how likely";
pub const TRANSCRIBE: &str = "Transcribe all text";

pub struct TestEnv {
    pub server: MockServer,
    pub state: AppState,
    pub dir: TempDir,
}

impl TestEnv {
    pub async fn new() -> Self {
        Self::build(Some("test-key")).await
    }

    /// No explicit key; callers clear the key environment variables
    pub async fn without_key() -> Self {
        Self::build(None).await
    }

    async fn build(api_key: Option<&str>) -> Self {
        let server = MockServer::start_async().await;
        let dir = TempDir::new().unwrap();
        let mut state = AppState::new().with_config_path(dir.path().join("config.json"));
        if let Some(key) = api_key {
            state = state.with_api_key(key);
        }
        state.initialize().await.unwrap();

        let update = SettingsUpdate {
            model: Some(MODEL.to_string()),
            base_url: Some(server.base_url()),
            ..Default::default()
        };
        let response = commands::update_settings(&state, update).await;
        assert!(response.success, "{:?}", response.error);

        Self { server, state, dir }
    }

    /// Answer requests containing `phrase` with a text candidate
    pub async fn reply(&self, phrase: &str, text: &str) -> Mock<'_> {
        self.reply_json(phrase, candidate(text, json!([]))).await
    }

    /// Answer requests containing `phrase` with a raw envelope
    pub async fn reply_json(&self, phrase: &str, body: Value) -> Mock<'_> {
        let phrase = phrase.to_string();
        self.server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(ENDPOINT)
                    .header("x-goog-api-key", "test-key")
                    .body_includes(phrase);
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(body);
            })
            .await
    }

    /// Fail requests containing `phrase` with a server error
    pub async fn fail(&self, phrase: &str) -> Mock<'_> {
        let phrase = phrase.to_string();
        self.server
            .mock_async(|when, then| {
                when.method(POST).path(ENDPOINT).body_includes(phrase);
                then.status(500)
                    .header("content-type", "application/json")
                    .json_body(json!({ "error": { "code": 500, "message": "backend unavailable" } }));
            })
            .await
    }

    /// Script the four full-scan calls
    pub async fn script_scan(&self, suggestions: Value, ai_score: u8) {
        self.reply(GRAMMAR, &suggestions.to_string()).await;
        self.reply_json(
            SOURCES,
            candidate(
                "The statements are supported.",
                json!([
                    { "web": { "uri": "https://journal.example/a", "title": "Journal A" } },
                    { "web": { "uri": "https://journal.example/a", "title": "Journal A (mirror)" } },
                    { "web": { "uri": "https://archive.example/b" } }
                ]),
            ),
        )
        .await;
        self.reply(SUMMARY, "  The draft describes a qualitative study.  ").await;
        self.reply(
            AI_DETECTION,
            &json!({
                "score": ai_score,
                "label": if ai_score > 60 { "Likely AI-Generated" } else { "Likely Human" },
                "explanation": "Varied sentence length."
            })
            .to_string(),
        )
        .await;
    }
}

/// A single-candidate Gemini envelope
pub fn candidate(text: &str, grounding_chunks: Value) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP",
            "groundingMetadata": { "groundingChunks": grounding_chunks }
        }],
        "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 5 }
    })
}

pub const DRAFT: &str = "We utilise a qualitative approach. The Eiffel Tower is in Berlin.";

pub fn one_suggestion() -> Value {
    json!([{
        "originalText": "utilise",
        "suggestedText": "use",
        "explanation": "Simpler word.",
        "type": "Style",
        "severity": "Minor"
    }])
}
