//! Selection fact-checking against a mock Gemini server.

use draftcheck::commands;
use draftcheck::models::analysis::{ClaimStatus, ResultTab};
use draftcheck::models::session::VERIFY_FAILED_MESSAGE;
use draftcheck::RunOutcome;
use serde_json::json;

use crate::common::*;

fn claims_body() -> String {
    json!([{
        "claim": "The Eiffel Tower is in Berlin.",
        "status": "False",
        "explanation": "The tower stands in Paris.",
        "sources": [
            { "url": "https://paris.example/tower", "title": "Tower facts" },
            { "url": "https://paris.example/tower", "title": "Tower facts again" },
            { "url": "https://atlas.example", "title": "Atlas", "snippet": "Paris, France" }
        ]
    }])
    .to_string()
}

fn selection_bounds(passage: &str) -> (usize, usize) {
    let byte_start = DRAFT.find(passage).unwrap();
    let start = DRAFT[..byte_start].chars().count();
    (start, start + passage.chars().count())
}

#[tokio::test]
async fn test_verify_selection_records_claims() {
    let env = TestEnv::new().await;
    let claims = env.reply(CLAIMS, &claims_body()).await;

    commands::open_text(&env.state, "draft.txt", DRAFT).await;
    let (start, end) = selection_bounds("The Eiffel Tower is in Berlin.");
    let selected = commands::select_text(&env.state, start, end).await;
    assert_eq!(
        selected.data.flatten().as_deref(),
        Some("The Eiffel Tower is in Berlin.")
    );

    let response = commands::verify_selection(&env.state).await;
    assert!(response.success, "{:?}", response.error);
    let report = response.data.unwrap();
    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.session.active_tab, ResultTab::Sources);

    let results = &report.session.analysis.claim_verification;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status, ClaimStatus::False);
    assert_eq!(results[0].sources.len(), 2);
    assert_eq!(results[0].sources[1].snippet.as_deref(), Some("Paris, France"));

    claims.assert_calls_async(1).await;
}

#[tokio::test]
async fn test_verify_without_selection_is_skipped() {
    let env = TestEnv::new().await;
    let claims = env.reply(CLAIMS, &claims_body()).await;

    commands::open_text(&env.state, "draft.txt", DRAFT).await;
    let report = commands::verify_selection(&env.state).await.data.unwrap();
    assert_eq!(report.outcome, RunOutcome::Skipped);
    claims.assert_calls_async(0).await;
}

#[tokio::test]
async fn test_verify_failure_keeps_selection() {
    let env = TestEnv::new().await;
    env.fail(CLAIMS).await;

    commands::open_text(&env.state, "draft.txt", DRAFT).await;
    let (start, end) = selection_bounds("qualitative approach");
    commands::select_text(&env.state, start, end).await;

    let response = commands::verify_selection(&env.state).await;
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some(VERIFY_FAILED_MESSAGE));

    let session = response.data.unwrap().session;
    assert!(session.analysis.claim_verification.is_empty());
    assert!(!session.analysis.is_analyzing);
    assert_eq!(session.selection.map(|s| s.text).as_deref(), Some("qualitative approach"));
}

#[tokio::test]
async fn test_out_of_range_selection_rejected() {
    let env = TestEnv::new().await;
    commands::open_text(&env.state, "draft.txt", "short").await;
    let response = commands::select_text(&env.state, 2, 400).await;
    assert!(!response.success);
}
