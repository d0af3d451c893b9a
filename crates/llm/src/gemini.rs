//! Gemini Provider
//!
//! Implementation of the LlmProvider trait for Google's Generative Language
//! REST API (`models/{model}:generateContent`).
//! Supports JSON mode with response schemas, Google Search grounding, and
//! inline binary parts for document transcription.

use async_trait::async_trait;
use serde::Deserialize;

use super::provider::{missing_api_key_error, parse_http_error, LlmProvider};
use super::types::{
    ContentRole, FinishReason, GenerationRequest, GroundingCitation, LlmError, LlmResponse,
    LlmResult, Part, ProviderConfig, UsageStats,
};

/// Default Gemini API base
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini provider
pub struct GeminiProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider with the given configuration
    pub fn new(config: ProviderConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Create a provider that sends through a preconfigured client
    /// (proxy, timeout).
    pub fn with_client(config: ProviderConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Get the API base URL
    fn base_url(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or(GEMINI_API_BASE)
            .trim_end_matches('/')
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url(), self.config.model)
    }

    /// Build the request body for the API.
    ///
    /// The API refuses JSON mode together with the search tool, so a grounded
    /// request carries its schema as a prompt instruction instead.
    fn build_request_body(&self, request: &GenerationRequest) -> serde_json::Value {
        let mut contents: Vec<serde_json::Value> = request
            .contents
            .iter()
            .map(|content| {
                let role = match content.role {
                    ContentRole::User => "user",
                    ContentRole::Model => "model",
                };
                let parts: Vec<serde_json::Value> =
                    content.parts.iter().map(part_to_gemini).collect();
                serde_json::json!({ "role": role, "parts": parts })
            })
            .collect();

        let mut generation_config = serde_json::json!({
            "temperature": request.temperature.unwrap_or(self.config.temperature),
        });
        if let Some(max) = self.config.max_output_tokens {
            generation_config["maxOutputTokens"] = serde_json::json!(max);
        }
        match &request.response_schema {
            Some(schema) if request.grounding => {
                let instruction = format!(
                    "Respond with only a JSON value matching this schema, with no other text:\n{}",
                    serde_json::json!(schema)
                );
                if let Some(parts) = contents
                    .last_mut()
                    .and_then(|c| c["parts"].as_array_mut())
                {
                    parts.push(serde_json::json!({ "text": instruction }));
                }
            }
            Some(schema) => {
                generation_config["responseMimeType"] = serde_json::json!("application/json");
                generation_config["responseSchema"] = serde_json::json!(schema);
            }
            None => {}
        }

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": generation_config,
        });

        if let Some(system) = &request.system_instruction {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": system }]
            });
        }

        if request.grounding {
            body["tools"] = serde_json::json!([{ "googleSearch": {} }]);
        }

        body
    }

    /// Convert the API response into the provider-neutral shape
    fn parse_response(&self, response: &GeminiResponse) -> LlmResponse {
        let candidate = response.candidates.first();

        let text: String = candidate
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|p| !p.thought.unwrap_or(false))
                    .filter_map(|p| p.text.as_deref())
                    .collect()
            })
            .unwrap_or_default();

        let citations = candidate
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|meta| {
                meta.grounding_chunks
                    .iter()
                    .filter_map(|chunk| chunk.web.as_ref())
                    .filter_map(|web| {
                        web.uri.as_ref().map(|uri| GroundingCitation {
                            uri: uri.clone(),
                            title: web.title.clone(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let finish_reason = match candidate.and_then(|c| c.finish_reason.as_deref()) {
            Some(reason) => FinishReason::from(reason),
            None => match response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_deref())
            {
                Some(_) => FinishReason::Safety,
                None => FinishReason::Stop,
            },
        };

        let usage = response
            .usage_metadata
            .as_ref()
            .map(|u| UsageStats {
                input_tokens: u.prompt_token_count.unwrap_or(0),
                output_tokens: u.candidates_token_count.unwrap_or(0),
            })
            .unwrap_or_default();

        LlmResponse {
            content: if text.is_empty() { None } else { Some(text) },
            citations,
            finish_reason,
            usage,
            model: response
                .model_version
                .clone()
                .unwrap_or_else(|| self.config.model.clone()),
        }
    }
}

fn part_to_gemini(part: &Part) -> serde_json::Value {
    match part {
        Part::Text { text } => serde_json::json!({ "text": text }),
        Part::InlineData { mime_type, data } => serde_json::json!({
            "inlineData": { "mimeType": mime_type, "data": data }
        }),
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn supports_grounding(&self) -> bool {
        true
    }

    fn supports_multimodal(&self) -> bool {
        true
    }

    async fn generate(&self, request: GenerationRequest) -> LlmResult<LlmResponse> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| missing_api_key_error("gemini"))?;

        let body = self.build_request_body(&request);

        tracing::debug!(
            model = %self.config.model,
            prompt_chars = request.text_len(),
            schema = request.response_schema.is_some(),
            grounding = request.grounding,
            "Sending Gemini request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body_text = response.text().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;

        if !(200..300).contains(&status) {
            return Err(parse_http_error(status, &body_text, "gemini"));
        }

        let gemini_response: GeminiResponse =
            serde_json::from_str(&body_text).map_err(|e| LlmError::ParseError {
                message: format!("Failed to parse response: {}", e),
            })?;

        Ok(self.parse_response(&gemini_response))
    }

    async fn health_check(&self) -> LlmResult<()> {
        let request = GenerationRequest::text("Reply with the single word: ok");
        self.generate(request).await.map(|_| ())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

/// Gemini API response format
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    thought: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}
