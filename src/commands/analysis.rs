//! Analysis Commands
//!
//! Full-document scans and selection verification on the active session.

use serde::{Deserialize, Serialize};

use crate::models::response::CommandResponse;
use crate::models::session::SessionState;
use crate::services::orchestrator::RunOutcome;
use crate::state::AppState;

/// Result of an analysis command
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub session: SessionState,
}

fn report(outcome: RunOutcome, session: SessionState) -> CommandResponse<RunReport> {
    let error = match outcome {
        RunOutcome::Failed => session.analysis.error.clone(),
        _ => None,
    };
    CommandResponse {
        success: error.is_none(),
        data: Some(RunReport { outcome, session }),
        error,
    }
}

/// Run grammar, sources, summary and AI detection on the whole document
pub async fn run_full_scan(state: &AppState) -> CommandResponse<RunReport> {
    let session = match state.session().await {
        Ok(session) => session,
        Err(e) => return CommandResponse::err(e.to_string()),
    };
    let outcome = session.full_scan().await;
    report(outcome, session.snapshot().await)
}

/// Fact-check the current selection
pub async fn verify_selection(state: &AppState) -> CommandResponse<RunReport> {
    let session = match state.session().await {
        Ok(session) => session,
        Err(e) => return CommandResponse::err(e.to_string()),
    };
    let outcome = session.verify_selection().await;
    report(outcome, session.snapshot().await)
}
