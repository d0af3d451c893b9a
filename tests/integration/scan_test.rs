//! Full scan through the command layer against a mock Gemini server.

use draftcheck::commands;
use draftcheck::models::analysis::{AiDetectionResult, AiLabel, ResultTab};
use draftcheck::models::session::SCAN_FAILED_MESSAGE;
use draftcheck::services::suggestions::ApplyOutcome;
use draftcheck::state::API_KEY_ENV_VARS;
use draftcheck::RunOutcome;
use serde_json::json;

use crate::common::*;

#[tokio::test]
async fn test_full_scan_populates_results() {
    let env = TestEnv::new().await;
    env.script_scan(one_suggestion(), 20).await;

    commands::open_text(&env.state, "draft.txt", DRAFT).await;
    let response = commands::run_full_scan(&env.state).await;
    assert!(response.success, "{:?}", response.error);

    let report = response.data.unwrap();
    assert_eq!(report.outcome, RunOutcome::Completed);

    let analysis = &report.session.analysis;
    assert!(!analysis.is_analyzing);
    assert!(analysis.error.is_none());
    assert_eq!(analysis.suggestions.len(), 1);
    assert_eq!(analysis.suggestions[0].original_text, "utilise");

    // Duplicate URLs collapse to the first occurrence
    assert_eq!(analysis.sources.len(), 2);
    assert_eq!(analysis.sources[0].title, "Journal A");
    assert_eq!(analysis.sources[1].title, "https://archive.example/b");

    assert_eq!(
        analysis.summary.as_deref(),
        Some("The draft describes a qualitative study.")
    );
    let ai = analysis.ai_detection.as_ref().unwrap();
    assert_eq!(ai.score, 20);
    assert_eq!(ai.label, AiLabel::LikelyHuman);

    assert_eq!(report.session.active_tab, ResultTab::Issues);
}

#[tokio::test]
async fn test_high_ai_score_opens_ai_check() {
    let env = TestEnv::new().await;
    env.script_scan(one_suggestion(), 91).await;

    commands::open_text(&env.state, "draft.txt", DRAFT).await;
    let report = commands::run_full_scan(&env.state).await.data.unwrap();
    assert_eq!(report.session.active_tab, ResultTab::AiCheck);
}

#[tokio::test]
async fn test_scan_without_suggestions_opens_sources() {
    let env = TestEnv::new().await;
    env.script_scan(json!([]), 10).await;

    commands::open_text(&env.state, "draft.txt", DRAFT).await;
    let report = commands::run_full_scan(&env.state).await.data.unwrap();
    assert!(report.session.analysis.suggestions.is_empty());
    assert_eq!(report.session.active_tab, ResultTab::Sources);
}

#[tokio::test]
async fn test_one_failed_call_fails_the_scan() {
    let env = TestEnv::new().await;
    env.fail(GRAMMAR).await;
    env.reply(SOURCES, "ok").await;
    env.reply(SUMMARY, "A summary.").await;
    env.reply(AI_DETECTION, r#"{"score": 5, "label": "Likely Human", "explanation": "x"}"#)
        .await;

    commands::open_text(&env.state, "draft.txt", DRAFT).await;
    let response = commands::run_full_scan(&env.state).await;
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some(SCAN_FAILED_MESSAGE));

    let report = response.data.unwrap();
    assert_eq!(report.outcome, RunOutcome::Failed);
    assert!(!report.session.analysis.is_analyzing);
    assert!(report.session.analysis.summary.is_none());
    assert!(report.session.analysis.ai_detection.is_none());
}

#[tokio::test]
async fn test_unreadable_bodies_degrade_to_fallbacks() {
    let env = TestEnv::new().await;
    env.reply(GRAMMAR, "I could not produce JSON today.").await;
    env.reply(SOURCES, "nothing found").await;
    env.reply_json(SUMMARY, json!({ "candidates": [] })).await;
    env.reply(AI_DETECTION, "```json\n{\"score\": \"high\"}\n```").await;

    commands::open_text(&env.state, "draft.txt", DRAFT).await;
    let response = commands::run_full_scan(&env.state).await;
    assert!(response.success, "{:?}", response.error);

    let analysis = response.data.unwrap().session.analysis;
    assert!(analysis.suggestions.is_empty());
    assert!(analysis.sources.is_empty());
    assert_eq!(analysis.summary.as_deref(), Some("Could not generate summary."));
    let ai = analysis.ai_detection.unwrap();
    assert_eq!(ai.score, 0);
    assert_eq!(ai.label, AiLabel::LikelyHuman);
}

#[tokio::test]
async fn test_blank_document_skips_scan_without_calls() {
    let env = TestEnv::new().await;
    let grammar = env.reply(GRAMMAR, "[]").await;

    commands::open_text(&env.state, "empty.txt", "   \n\t ").await;
    let report = commands::run_full_scan(&env.state).await.data.unwrap();
    assert_eq!(report.outcome, RunOutcome::Skipped);
    grammar.assert_calls_async(0).await;
}

#[tokio::test]
async fn test_accepting_suggestions_after_scan() {
    let env = TestEnv::new().await;
    env.script_scan(
        json!([
            { "originalText": "utilise", "suggestedText": "use",
              "explanation": "Simpler word.", "type": "Style", "severity": "Minor" },
            { "originalText": "in Berlin", "suggestedText": "in Paris",
              "explanation": "Wrong city.", "type": "Clarity", "severity": "Critical" },
            { "originalText": "not in the text", "suggestedText": "x",
              "explanation": "Stale.", "type": "Grammar", "severity": "Major" }
        ]),
        15,
    )
    .await;

    commands::open_text(&env.state, "draft.txt", DRAFT).await;
    let report = commands::run_full_scan(&env.state).await.data.unwrap();
    let first_id = report.session.analysis.suggestions[0].id.clone();

    let outcome = commands::apply_suggestion(&env.state, &first_id).await;
    assert_eq!(outcome.data, Some(ApplyOutcome::Applied));

    // Applying the same id twice is an error; it is already gone
    assert!(!commands::apply_suggestion(&env.state, &first_id).await.success);

    let all = commands::apply_all_suggestions(&env.state).await.data.unwrap();
    assert_eq!(all.applied, 1);
    assert_eq!(all.not_found, 1);

    let session = commands::get_session(&env.state).await.data.unwrap();
    assert_eq!(
        session.document.text,
        "We use a qualitative approach. The Eiffel Tower is in Paris."
    );
    assert!(session.analysis.suggestions.is_empty());
    // Other results survive edits
    assert!(session.analysis.summary.is_some());
}

#[tokio::test]
async fn test_missing_key_fails_scan_and_keeps_results() {
    for var in API_KEY_ENV_VARS {
        std::env::remove_var(var);
    }
    let env = TestEnv::without_key().await;
    let grammar = env.reply(GRAMMAR, "[]").await;

    commands::open_text(&env.state, "draft.txt", DRAFT).await;
    {
        let session = env.state.session().await.unwrap();
        let shared = session.shared_state();
        let mut state = shared.write().await;
        state.analysis.summary = Some("Earlier summary.".to_string());
        state.analysis.ai_detection = Some(AiDetectionResult::fallback());
    }

    let response = commands::run_full_scan(&env.state).await;
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some(SCAN_FAILED_MESSAGE));

    let report = response.data.unwrap();
    assert_eq!(report.outcome, RunOutcome::Failed);
    assert!(!report.session.analysis.is_analyzing);
    assert_eq!(report.session.analysis.summary.as_deref(), Some("Earlier summary."));
    assert!(report.session.analysis.ai_detection.is_some());
    assert_eq!(report.session.document.text, DRAFT);
    grammar.assert_calls_async(0).await;
}
