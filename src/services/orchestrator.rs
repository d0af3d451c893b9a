//! Analysis Orchestrator
//!
//! Runs a full scan (grammar, sources, summary and AI detection fanned out
//! concurrently, joined before anything is written) or a selection-scoped
//! claim verification, then routes the visible result tab.
//!
//! Session state is only locked around the start and completion transitions,
//! never across a model call.

use std::sync::Arc;

use draftcheck_llm::LlmError;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::models::analysis::{ResultTab, ScanResults};
use crate::models::session::SessionState;
use crate::services::gateway::ModelGateway;
use crate::utils::error::{AppError, AppResult};

/// Session state shared between the controller and in-flight runs
pub type SharedSession = Arc<RwLock<SessionState>>;

/// How a run ended, as seen by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Results were written to the session
    Completed,
    /// The run failed and the generic error was recorded
    Failed,
    /// Nothing to do: empty input or a run already in flight
    Skipped,
    /// The session moved on (upload) before the run finished; results dropped
    Superseded,
}

/// Pick the tab to show after a successful scan.
///
/// A high AI score wins over everything, then grammar issues, then sources.
/// `None` keeps whatever tab is showing.
pub fn route_tab(results: &ScanResults, ai_tab_threshold: u8) -> Option<ResultTab> {
    if results.ai_detection.score > ai_tab_threshold {
        Some(ResultTab::AiCheck)
    } else if !results.suggestions.is_empty() {
        Some(ResultTab::Issues)
    } else if !results.sources.is_empty() {
        Some(ResultTab::Sources)
    } else {
        None
    }
}

/// Handle to a full scan running on the tokio runtime
pub struct ScanHandle {
    inner: JoinHandle<RunOutcome>,
}

impl ScanHandle {
    /// Wait for the scan to settle.
    pub async fn wait(self) -> AppResult<RunOutcome> {
        self.inner
            .await
            .map_err(|e| AppError::internal(format!("Scan task failed: {}", e)))
    }

    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

#[derive(Clone)]
pub struct AnalysisOrchestrator {
    gateway: Arc<ModelGateway>,
    state: SharedSession,
    ai_tab_threshold: u8,
}

impl AnalysisOrchestrator {
    pub fn new(gateway: Arc<ModelGateway>, state: SharedSession, ai_tab_threshold: u8) -> Self {
        Self {
            gateway,
            state,
            ai_tab_threshold,
        }
    }

    /// Run all four whole-document analyses and merge them in one step.
    ///
    /// All four requests run to completion even when one fails; any failure
    /// discards the whole set and keeps the previous results.
    pub async fn run_full_scan(&self) -> RunOutcome {
        let (ticket, text) = {
            let mut state = self.state.write().await;
            match state.start_scan() {
                Some(ticket) => (ticket, state.document.text.clone()),
                None => {
                    tracing::debug!(
                        analyzing = state.analysis.is_analyzing,
                        "Full scan skipped"
                    );
                    return RunOutcome::Skipped;
                }
            }
        };

        tracing::info!(
            generation = ticket.generation,
            chars = text.chars().count(),
            model = %self.gateway.model(),
            "Starting full scan"
        );

        let (grammar, sources, summary, ai_detection) = tokio::join!(
            self.gateway.check_grammar_and_style(&text),
            self.gateway.verify_sources(&text),
            self.gateway.generate_summary(&text),
            self.gateway.detect_ai_content(&text),
        );

        let outcome = match (grammar, sources, summary, ai_detection) {
            (Ok(suggestions), Ok(sources), Ok(summary), Ok(ai_detection)) => Ok(ScanResults {
                suggestions,
                sources,
                summary,
                ai_detection,
            }),
            (grammar, sources, summary, ai_detection) => {
                let failures: Vec<(&str, LlmError)> = [
                    ("grammar", grammar.err()),
                    ("sources", sources.err()),
                    ("summary", summary.err()),
                    ("ai_detection", ai_detection.err()),
                ]
                .into_iter()
                .filter_map(|(name, err)| err.map(|e| (name, e)))
                .collect();
                Err(failures)
            }
        };

        let mut state = self.state.write().await;
        match outcome {
            Ok(results) => {
                let tab = route_tab(&results, self.ai_tab_threshold);
                let counts = (results.suggestions.len(), results.sources.len());
                let score = results.ai_detection.score;
                if state.scan_succeeded(ticket, results, tab) {
                    tracing::info!(
                        generation = ticket.generation,
                        suggestions = counts.0,
                        sources = counts.1,
                        ai_score = score,
                        tab = ?tab,
                        "Full scan completed"
                    );
                    RunOutcome::Completed
                } else {
                    tracing::warn!(generation = ticket.generation, "Discarding stale scan results");
                    RunOutcome::Superseded
                }
            }
            Err(failures) => {
                for (operation, err) in failures {
                    tracing::error!(operation, error = %err, "Full scan request failed");
                }
                if state.scan_failed(ticket) {
                    RunOutcome::Failed
                } else {
                    tracing::warn!(generation = ticket.generation, "Discarding stale scan failure");
                    RunOutcome::Superseded
                }
            }
        }
    }

    /// Start a full scan on the runtime and return its handle.
    pub fn spawn_full_scan(&self) -> ScanHandle {
        let this = self.clone();
        ScanHandle {
            inner: tokio::spawn(async move { this.run_full_scan().await }),
        }
    }

    /// Fact-check the current selection, replacing only the claim list.
    pub async fn verify_selection(&self) -> RunOutcome {
        let Some((ticket, text)) = self.state.write().await.start_verify() else {
            tracing::debug!("Selection verification skipped");
            return RunOutcome::Skipped;
        };

        tracing::info!(
            generation = ticket.generation,
            chars = text.chars().count(),
            "Verifying selection"
        );
        let result = self.gateway.verify_text_claims(&text).await;

        let mut state = self.state.write().await;
        let outcome = match result {
            Ok(claims) => {
                let count = claims.len();
                if state.verify_succeeded(ticket, claims) {
                    tracing::info!(claims = count, "Selection verified");
                    RunOutcome::Completed
                } else {
                    RunOutcome::Superseded
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "Selection verification failed");
                if state.verify_failed(ticket) {
                    RunOutcome::Failed
                } else {
                    RunOutcome::Superseded
                }
            }
        };
        if outcome == RunOutcome::Superseded {
            tracing::warn!(generation = ticket.generation, "Discarding stale verification");
        }
        outcome
    }
}
