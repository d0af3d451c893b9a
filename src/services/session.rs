//! Document Session Controller
//!
//! Owns the session state for one document and exposes every user action:
//! editing, selecting, uploading, scanning, verifying, and accepting or
//! dismissing suggestions. All state changes go through the transitions on
//! [`SessionState`].

use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::analysis::ResultTab;
use crate::models::document::Document;
use crate::models::session::SessionState;
use crate::services::gateway::ModelGateway;
use crate::services::orchestrator::{AnalysisOrchestrator, RunOutcome, ScanHandle, SharedSession};
use crate::services::suggestions::{self, ApplyAllReport, ApplyOutcome};
use crate::services::upload::{self, UploadedFile};
use crate::utils::error::AppResult;

pub struct DocumentSession {
    state: SharedSession,
    gateway: Arc<ModelGateway>,
    orchestrator: AnalysisOrchestrator,
}

impl DocumentSession {
    pub fn with_document(gateway: Arc<ModelGateway>, ai_tab_threshold: u8, document: Document) -> Self {
        let state = Arc::new(RwLock::new(SessionState::new(document)));
        Self::attach(state, gateway, ai_tab_threshold)
    }

    /// Drive existing session state through a new gateway.
    ///
    /// The document and results in `state` are left as they are.
    pub fn attach(state: SharedSession, gateway: Arc<ModelGateway>, ai_tab_threshold: u8) -> Self {
        let orchestrator = AnalysisOrchestrator::new(gateway.clone(), state.clone(), ai_tab_threshold);
        Self {
            state,
            gateway,
            orchestrator,
        }
    }

    /// Copy of the whole session state
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub fn shared_state(&self) -> SharedSession {
        self.state.clone()
    }

    /// Replace the document with local text, as an upload would.
    pub async fn open_text(&self, title: impl Into<String>, text: impl Into<String>) {
        let document = Document::new(title, text);
        tracing::info!(title = %document.title, chars = document.char_count(), "Opened text document");
        self.state.write().await.upload_succeeded(document);
    }

    pub async fn edit_text(&self, text: impl Into<String>) {
        self.state.write().await.edit_text(text);
    }

    /// Track a char range; returns the selected text, if any.
    pub async fn select(&self, start: usize, end: usize) -> AppResult<Option<String>> {
        let mut state = self.state.write().await;
        let selection = state.select(start, end)?;
        Ok(selection.map(|s| s.text.clone()))
    }

    pub async fn clear_selection(&self) {
        self.state.write().await.clear_selection();
    }

    pub async fn set_tab(&self, tab: ResultTab) {
        self.state.write().await.set_tab(tab);
    }

    pub async fn full_scan(&self) -> RunOutcome {
        self.orchestrator.run_full_scan().await
    }

    pub fn spawn_full_scan(&self) -> ScanHandle {
        self.orchestrator.spawn_full_scan()
    }

    pub async fn verify_selection(&self) -> RunOutcome {
        self.orchestrator.verify_selection().await
    }

    pub async fn apply_suggestion(&self, id: &str) -> ApplyOutcome {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let outcome = suggestions::apply_by_id(&mut state.document, &mut state.analysis.suggestions, id);
        tracing::info!(id, outcome = ?outcome, "Suggestion accepted");
        outcome
    }

    pub async fn apply_all_suggestions(&self) -> ApplyAllReport {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let report = suggestions::apply_all(&mut state.document, &mut state.analysis.suggestions);
        tracing::info!(applied = report.applied, not_found = report.not_found, "Accepted all suggestions");
        report
    }

    pub async fn dismiss_suggestion(&self, id: &str) -> bool {
        suggestions::dismiss(&mut self.state.write().await.analysis.suggestions, id)
    }

    /// Read, transcribe and load a file from disk.
    ///
    /// On failure the document and analysis are untouched, the session's
    /// document error is set, and the underlying error is returned.
    pub async fn upload_file(&self, path: &Path) -> AppResult<Document> {
        self.state.write().await.start_upload();
        match upload::read_upload(path).await {
            Ok(file) => self.finish_upload(file).await,
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "Failed to read upload");
                self.state.write().await.upload_failed();
                Err(err)
            }
        }
    }

    /// Transcribe and load a file that is already in memory.
    pub async fn upload_bytes(&self, file_name: &str, bytes: &[u8], mime_type: &str) -> AppResult<Document> {
        self.state.write().await.start_upload();
        match upload::encode_upload(file_name, bytes, mime_type) {
            Ok(file) => self.finish_upload(file).await,
            Err(err) => {
                tracing::error!(file = file_name, error = %err, "Failed to encode upload");
                self.state.write().await.upload_failed();
                Err(err)
            }
        }
    }

    async fn finish_upload(&self, file: UploadedFile) -> AppResult<Document> {
        match self
            .gateway
            .extract_text_from_file(&file.data, &file.mime_type)
            .await
        {
            Ok(text) => {
                let document = Document::new(file.file_name.clone(), text);
                tracing::info!(
                    file = %file.file_name,
                    chars = document.char_count(),
                    "Loaded uploaded document"
                );
                self.state.write().await.upload_succeeded(document.clone());
                Ok(document)
            }
            Err(err) => {
                tracing::error!(file = %file.file_name, error = %err, "Transcription failed");
                self.state.write().await.upload_failed();
                Err(err.into())
            }
        }
    }
}
