//! Analysis Models
//!
//! Typed results of every model-service analysis and the aggregate that
//! holds them for one session. Field names serialize in camelCase so the
//! snapshot matches what a presentation layer expects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Category of a proposed correction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionType {
    Grammar,
    Spelling,
    Style,
    Clarity,
}

impl SuggestionType {
    pub const ALL: [&'static str; 4] = ["Grammar", "Spelling", "Style", "Clarity"];
}

/// How much a correction matters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    Major,
    Minor,
}

impl Severity {
    pub const ALL: [&'static str; 3] = ["Critical", "Major", "Minor"];
}

/// A proposed text correction awaiting acceptance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    /// Literal text expected to appear in the document
    pub original_text: String,
    pub suggested_text: String,
    pub explanation: String,
    #[serde(rename = "type")]
    pub suggestion_type: SuggestionType,
    pub severity: Severity,
}

/// A web source backing some part of the text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMatch {
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Verdict on a single factual claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimStatus {
    Verified,
    Questionable,
    False,
    Unverifiable,
}

impl ClaimStatus {
    pub const ALL: [&'static str; 4] = ["Verified", "Questionable", "False", "Unverifiable"];
}

/// Fact-check outcome for one claim in a selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub id: String,
    pub claim: String,
    pub status: ClaimStatus,
    pub explanation: String,
    #[serde(default)]
    pub sources: Vec<SourceMatch>,
}

/// Coarse AI-authorship verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiLabel {
    #[serde(rename = "Likely Human")]
    LikelyHuman,
    #[serde(rename = "Mixed Signals")]
    MixedSignals,
    #[serde(rename = "Likely AI-Generated")]
    LikelyAiGenerated,
}

impl AiLabel {
    pub const ALL: [&'static str; 3] = ["Likely Human", "Mixed Signals", "Likely AI-Generated"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LikelyHuman => "Likely Human",
            Self::MixedSignals => "Mixed Signals",
            Self::LikelyAiGenerated => "Likely AI-Generated",
        }
    }
}

impl fmt::Display for AiLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AI-authorship likelihood for the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiDetectionResult {
    /// 0 to 100
    pub score: u8,
    pub label: AiLabel,
    pub explanation: String,
}

impl AiDetectionResult {
    /// Result reported when the service answer cannot be understood
    pub fn fallback() -> Self {
        Self {
            score: 0,
            label: AiLabel::LikelyHuman,
            explanation: "Could not analyze.".to_string(),
        }
    }
}

/// The four result views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultTab {
    #[default]
    Issues,
    AiCheck,
    Sources,
    Summary,
}

impl ResultTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issues => "issues",
            Self::AiCheck => "ai_check",
            Self::Sources => "sources",
            Self::Summary => "summary",
        }
    }
}

impl fmt::Display for ResultTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "issues" | "grammar" => Ok(Self::Issues),
            "ai_check" | "ai" => Ok(Self::AiCheck),
            "sources" | "claims" => Ok(Self::Sources),
            "summary" => Ok(Self::Summary),
            other => Err(format!(
                "Unknown tab '{}'. Expected issues, ai_check, sources or summary",
                other
            )),
        }
    }
}

/// Everything a successful full scan produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResults {
    pub suggestions: Vec<Suggestion>,
    pub sources: Vec<SourceMatch>,
    pub summary: String,
    pub ai_detection: AiDetectionResult,
}

/// Per-session analysis aggregate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisState {
    pub is_analyzing: bool,
    pub suggestions: Vec<Suggestion>,
    pub sources: Vec<SourceMatch>,
    pub claim_verification: Vec<VerificationResult>,
    pub summary: Option<String>,
    pub ai_detection: Option<AiDetectionResult>,
    pub error: Option<String>,
}

impl AnalysisState {
    pub fn has_results(&self) -> bool {
        !self.suggestions.is_empty()
            || !self.sources.is_empty()
            || !self.claim_verification.is_empty()
            || self.summary.is_some()
            || self.ai_detection.is_some()
    }
}
