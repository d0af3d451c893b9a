//! Document Commands
//!
//! Loading, editing and selecting document text, switching result tabs, and
//! accepting or dismissing suggestions.

use std::path::Path;

use crate::models::analysis::ResultTab;
use crate::models::document::Document;
use crate::models::response::CommandResponse;
use crate::models::session::{SessionState, UPLOAD_FAILED_MESSAGE};
use crate::services::suggestions::{ApplyAllReport, ApplyOutcome};
use crate::state::AppState;
use crate::utils::error::AppError;

macro_rules! active_session {
    ($state:expr) => {
        match $state.session().await {
            Ok(session) => session,
            Err(e) => return CommandResponse::err(e.to_string()),
        }
    };
}

/// Get the whole session state
pub async fn get_session(state: &AppState) -> CommandResponse<SessionState> {
    let session = active_session!(state);
    CommandResponse::ok(session.snapshot().await)
}

/// Upload a file and transcribe it into the document
pub async fn open_document(state: &AppState, path: &Path) -> CommandResponse<Document> {
    let session = active_session!(state);
    match session.upload_file(path).await {
        Ok(document) => CommandResponse::ok(document),
        Err(_) => CommandResponse::err(UPLOAD_FAILED_MESSAGE),
    }
}

/// Replace the document with plain text
pub async fn open_text(state: &AppState, title: &str, text: &str) -> CommandResponse<Document> {
    let session = active_session!(state);
    session.open_text(title, text).await;
    CommandResponse::ok(session.snapshot().await.document)
}

/// Replace the document text, keeping analysis results
pub async fn edit_text(state: &AppState, text: &str) -> CommandResponse<Document> {
    let session = active_session!(state);
    session.edit_text(text).await;
    CommandResponse::ok(session.snapshot().await.document)
}

/// Select a char range; returns the selected text
pub async fn select_text(state: &AppState, start: usize, end: usize) -> CommandResponse<Option<String>> {
    let session = active_session!(state);
    session.select(start, end).await.into()
}

/// Switch the visible result tab
pub async fn set_active_tab(state: &AppState, tab: &str) -> CommandResponse<ResultTab> {
    let tab: ResultTab = match tab.parse() {
        Ok(tab) => tab,
        Err(e) => return CommandResponse::err(AppError::validation(e).to_string()),
    };
    let session = active_session!(state);
    session.set_tab(tab).await;
    CommandResponse::ok(tab)
}

/// Accept one suggestion
pub async fn apply_suggestion(state: &AppState, id: &str) -> CommandResponse<ApplyOutcome> {
    let session = active_session!(state);
    match session.apply_suggestion(id).await {
        ApplyOutcome::UnknownSuggestion => {
            CommandResponse::err(AppError::not_found(format!("suggestion {}", id)).to_string())
        }
        outcome => CommandResponse::ok(outcome),
    }
}

/// Accept every pending suggestion
pub async fn apply_all_suggestions(state: &AppState) -> CommandResponse<ApplyAllReport> {
    let session = active_session!(state);
    CommandResponse::ok(session.apply_all_suggestions().await)
}

/// Drop a suggestion without applying it
pub async fn dismiss_suggestion(state: &AppState, id: &str) -> CommandResponse<bool> {
    let session = active_session!(state);
    if session.dismiss_suggestion(id).await {
        CommandResponse::ok(true)
    } else {
        CommandResponse::err(AppError::not_found(format!("suggestion {}", id)).to_string())
    }
}
