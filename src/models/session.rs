//! Session State
//!
//! The single mutable aggregate for one editing session: the document, the
//! current selection, the analysis results and the visible result tab.
//!
//! All mutation goes through the transition methods below. Each analysis run
//! is tagged with a generation number; a completion carrying an older
//! generation than the session's current one is discarded, so a response
//! that lands after an upload or a newer run can never overwrite fresher
//! state.

use draftcheck_core::{CoreResult, TextRange};
use serde::{Deserialize, Serialize};

use super::analysis::{AnalysisState, ResultTab, ScanResults, VerificationResult};
use super::document::Document;

/// Shown when any part of a full scan fails
pub const SCAN_FAILED_MESSAGE: &str =
    "Failed to complete analysis. Please check your API key and try again.";

/// Shown when selection verification fails
pub const VERIFY_FAILED_MESSAGE: &str = "Failed to verify selected text.";

/// Shown when an uploaded file cannot be read or transcribed
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to read document. Please try a different file.";

/// Kind of analysis run a ticket was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    FullScan,
    Verify,
}

/// Identity of one in-flight analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTicket {
    pub generation: u64,
    pub kind: RunKind,
}

/// Non-empty text the user has highlighted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub range: TextRange,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub document: Document,
    pub analysis: AnalysisState,
    pub selection: Option<Selection>,
    pub active_tab: ResultTab,
    /// Upload failures, kept apart from analysis errors
    pub document_error: Option<String>,
    pub is_uploading: bool,
    #[serde(skip)]
    generation: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Document::sample())
    }
}

impl SessionState {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            analysis: AnalysisState::default(),
            selection: None,
            active_tab: ResultTab::default(),
            document_error: None,
            is_uploading: false,
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn is_current(&self, ticket: RunTicket) -> bool {
        ticket.generation == self.generation && self.analysis.is_analyzing
    }

    fn begin_run(&mut self, kind: RunKind) -> RunTicket {
        self.generation += 1;
        self.analysis.is_analyzing = true;
        self.analysis.error = None;
        RunTicket {
            generation: self.generation,
            kind,
        }
    }

    /// Begin a full scan.
    ///
    /// Returns `None` without touching anything when the document is blank
    /// or another run is still in flight.
    pub fn start_scan(&mut self) -> Option<RunTicket> {
        if self.document.is_blank() || self.analysis.is_analyzing {
            return None;
        }
        let ticket = self.begin_run(RunKind::FullScan);
        self.analysis.claim_verification.clear();
        Some(ticket)
    }

    /// Replace all four full-scan fields at once.
    ///
    /// `next_tab` is the routed tab, or `None` to keep the current one.
    /// Returns false when the ticket is stale and nothing was applied.
    pub fn scan_succeeded(
        &mut self,
        ticket: RunTicket,
        results: ScanResults,
        next_tab: Option<ResultTab>,
    ) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.analysis.suggestions = results.suggestions;
        self.analysis.sources = results.sources;
        self.analysis.summary = Some(results.summary);
        self.analysis.ai_detection = Some(results.ai_detection);
        self.analysis.is_analyzing = false;
        if let Some(tab) = next_tab {
            self.active_tab = tab;
        }
        true
    }

    /// End a failed full scan, keeping every prior result.
    pub fn scan_failed(&mut self, ticket: RunTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.analysis.is_analyzing = false;
        self.analysis.error = Some(SCAN_FAILED_MESSAGE.to_string());
        true
    }

    /// Begin verification of the current selection.
    ///
    /// Switches to the sources tab immediately. Returns the ticket and the
    /// text to verify, or `None` when there is no usable selection or a run
    /// is in flight.
    pub fn start_verify(&mut self) -> Option<(RunTicket, String)> {
        if self.analysis.is_analyzing {
            return None;
        }
        let text = self
            .selection
            .as_ref()
            .map(|s| s.text.clone())
            .filter(|t| !t.trim().is_empty())?;
        let ticket = self.begin_run(RunKind::Verify);
        self.active_tab = ResultTab::Sources;
        Some((ticket, text))
    }

    /// Replace only the claim list.
    pub fn verify_succeeded(&mut self, ticket: RunTicket, claims: Vec<VerificationResult>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.analysis.claim_verification = claims;
        self.analysis.is_analyzing = false;
        true
    }

    pub fn verify_failed(&mut self, ticket: RunTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.analysis.is_analyzing = false;
        self.analysis.error = Some(VERIFY_FAILED_MESSAGE.to_string());
        true
    }

    pub fn start_upload(&mut self) {
        self.is_uploading = true;
        self.document_error = None;
    }

    /// Swap in an uploaded document and reset the whole aggregate.
    ///
    /// Bumps the generation so responses for the old document are dropped.
    pub fn upload_succeeded(&mut self, document: Document) {
        self.document = document;
        self.analysis = AnalysisState::default();
        self.selection = None;
        self.is_uploading = false;
        self.document_error = None;
        self.generation += 1;
    }

    /// Record an upload failure without disturbing the analysis.
    pub fn upload_failed(&mut self) {
        self.is_uploading = false;
        self.document_error = Some(UPLOAD_FAILED_MESSAGE.to_string());
    }

    /// Replace the document text. Analysis results are kept as they are.
    pub fn edit_text(&mut self, text: impl Into<String>) {
        self.document.text = text.into();
        self.selection = None;
    }

    /// Track the highlighted range; an empty range clears the selection.
    pub fn select(&mut self, start: usize, end: usize) -> CoreResult<Option<&Selection>> {
        let range = TextRange::new(start, end)?;
        let text = range.slice(&self.document.text)?.to_string();
        self.selection = if range.is_empty() {
            None
        } else {
            Some(Selection { range, text })
        };
        Ok(self.selection.as_ref())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn set_tab(&mut self, tab: ResultTab) {
        self.active_tab = tab;
    }
}
