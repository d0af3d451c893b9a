//! Response parsing for the gateway.
//!
//! Every parser returns `Result<T, ParseIssue>` so callers and tests can tell
//! "the service found nothing" apart from "the service answered with
//! something we could not read". The gateway operations then fold a
//! `ParseIssue` into their empty or fallback value.

use std::collections::HashSet;
use std::fmt;

use draftcheck_llm::GroundingCitation;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::models::analysis::{
    AiDetectionResult, AiLabel, ClaimStatus, Severity, SourceMatch, Suggestion, SuggestionType,
    VerificationResult,
};

/// Why a structured response could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseIssue {
    /// The response carried no text at all
    Empty,
    /// The text was not JSON
    NotJson(String),
    /// The JSON did not match the expected shape
    SchemaMismatch(String),
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty response"),
            Self::NotJson(msg) => write!(f, "response is not JSON: {}", msg),
            Self::SchemaMismatch(msg) => write!(f, "response does not match schema: {}", msg),
        }
    }
}

impl std::error::Error for ParseIssue {}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSuggestion {
    original_text: String,
    suggested_text: String,
    #[serde(default)]
    explanation: String,
    #[serde(rename = "type")]
    suggestion_type: SuggestionType,
    severity: Severity,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    url: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawClaim {
    claim: String,
    status: ClaimStatus,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    sources: Vec<RawSource>,
}

#[derive(Debug, Deserialize)]
struct RawAiDetection {
    score: f64,
    label: AiLabel,
    #[serde(default)]
    explanation: String,
}

/// Strip a surrounding markdown code fence, if the model added one.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };
    let rest = &trimmed[start + 3..];
    // Skip the info string ("json") up to the first newline
    let body = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest,
    };
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// The outermost `[...]` or `{...}` span in free text.
fn embedded_json(text: &str) -> Option<&str> {
    let start = text.find(['[', '{'])?;
    let closer = if text[start..].starts_with('[') { ']' } else { '}' };
    let end = text.rfind(closer)?;
    (end > start).then(|| &text[start..=end])
}

fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, ParseIssue> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(ParseIssue::Empty);
    }
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        // Grounded answers may wrap the JSON in prose
        Err(e) => embedded_json(body)
            .and_then(|inner| serde_json::from_str(inner).ok())
            .ok_or_else(|| ParseIssue::NotJson(e.to_string()))?,
    };
    serde_json::from_value(value).map_err(|e| ParseIssue::SchemaMismatch(e.to_string()))
}

/// Drop repeated URLs, keeping the first occurrence and its title.
pub fn dedupe_sources(sources: Vec<SourceMatch>) -> Vec<SourceMatch> {
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .filter(|s| seen.insert(s.url.clone()))
        .collect()
}

/// Turn grounding citations into deduplicated source matches.
pub fn sources_from_citations(citations: &[GroundingCitation]) -> Vec<SourceMatch> {
    let sources = citations
        .iter()
        .filter(|c| !c.uri.trim().is_empty())
        .map(|c| SourceMatch {
            url: c.uri.clone(),
            title: c
                .title
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| c.uri.clone()),
            snippet: None,
        })
        .collect();
    dedupe_sources(sources)
}

/// Parse a grammar/style response, assigning ids `sug-{index}-{stamp}`.
pub fn parse_suggestions(raw: &str, stamp: i64) -> Result<Vec<Suggestion>, ParseIssue> {
    let items: Vec<RawSuggestion> = decode(raw)?;
    Ok(items
        .into_iter()
        .enumerate()
        .map(|(i, item)| Suggestion {
            id: format!("sug-{}-{}", i, stamp),
            original_text: item.original_text,
            suggested_text: item.suggested_text,
            explanation: item.explanation,
            suggestion_type: item.suggestion_type,
            severity: item.severity,
        })
        .collect())
}

/// Parse a claim-verification response, assigning ids `claim-{index}-{stamp}`.
pub fn parse_claims(raw: &str, stamp: i64) -> Result<Vec<VerificationResult>, ParseIssue> {
    let items: Vec<RawClaim> = decode(raw)?;
    Ok(items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let sources = item
                .sources
                .into_iter()
                .map(|s| SourceMatch {
                    title: s.title.unwrap_or_else(|| s.url.clone()),
                    url: s.url,
                    snippet: s.snippet,
                })
                .collect();
            VerificationResult {
                id: format!("claim-{}-{}", i, stamp),
                claim: item.claim,
                status: item.status,
                explanation: item.explanation,
                sources: dedupe_sources(sources),
            }
        })
        .collect())
}

/// Parse an AI-detection response. Scores are rounded and clamped to 0..=100.
pub fn parse_ai_detection(raw: &str) -> Result<AiDetectionResult, ParseIssue> {
    let item: RawAiDetection = decode(raw)?;
    if !item.score.is_finite() {
        return Err(ParseIssue::SchemaMismatch(format!(
            "score is not a number: {}",
            item.score
        )));
    }
    Ok(AiDetectionResult {
        score: item.score.round().clamp(0.0, 100.0) as u8,
        label: item.label,
        explanation: item.explanation,
    })
}
