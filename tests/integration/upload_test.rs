//! Uploading files for transcription.

use draftcheck::commands;
use draftcheck::models::session::UPLOAD_FAILED_MESSAGE;

use crate::common::*;

#[tokio::test]
async fn test_upload_transcribes_and_resets_analysis() {
    let env = TestEnv::new().await;
    env.script_scan(one_suggestion(), 95).await;
    let transcribe = env.reply(TRANSCRIBE, "Transcribed body of the paper.").await;

    commands::open_text(&env.state, "draft.txt", DRAFT).await;
    commands::run_full_scan(&env.state).await;

    let path = env.dir.path().join("paper.pdf");
    std::fs::write(&path, b"%PDF-1.4 fake pdf bytes").unwrap();

    let response = commands::open_document(&env.state, &path).await;
    assert!(response.success, "{:?}", response.error);
    let document = response.data.unwrap();
    assert_eq!(document.title, "paper.pdf");
    assert_eq!(document.text, "Transcribed body of the paper.");
    transcribe.assert_calls_async(1).await;

    let session = commands::get_session(&env.state).await.data.unwrap();
    assert_eq!(session.document, document);
    assert!(!session.analysis.has_results());
    assert!(session.analysis.suggestions.is_empty());
    assert!(session.analysis.ai_detection.is_none());
    assert!(session.selection.is_none());
    assert!(!session.is_uploading);
    assert!(session.document_error.is_none());
}

#[tokio::test]
async fn test_upload_sends_inline_pdf() {
    let env = TestEnv::new().await;
    let inline = env
        .reply_json(
            "\"mimeType\":\"application/pdf\"",
            candidate("From the PDF.", serde_json::json!([])),
        )
        .await;

    let path = env.dir.path().join("scan.pdf");
    std::fs::write(&path, b"%PDF-1.4").unwrap();
    let document = commands::open_document(&env.state, &path).await.data.unwrap();

    assert_eq!(document.text, "From the PDF.");
    inline.assert_calls_async(1).await;
}

#[tokio::test]
async fn test_failed_transcription_keeps_document() {
    let env = TestEnv::new().await;
    env.fail(TRANSCRIBE).await;

    commands::open_text(&env.state, "draft.txt", DRAFT).await;
    let path = env.dir.path().join("notes.docx");
    std::fs::write(&path, b"PK\x03\x04 not really a docx").unwrap();

    let response = commands::open_document(&env.state, &path).await;
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some(UPLOAD_FAILED_MESSAGE));

    let session = commands::get_session(&env.state).await.data.unwrap();
    assert_eq!(session.document.text, DRAFT);
    assert!(!session.is_uploading);
    assert_eq!(session.document_error.as_deref(), Some(UPLOAD_FAILED_MESSAGE));
}

#[tokio::test]
async fn test_missing_file_fails_without_request() {
    let env = TestEnv::new().await;
    let transcribe = env.reply(TRANSCRIBE, "never").await;

    let path = env.dir.path().join("nowhere.pdf");
    let response = commands::open_document(&env.state, &path).await;
    assert!(!response.success);
    transcribe.assert_calls_async(0).await;
}

#[tokio::test]
async fn test_empty_file_rejected() {
    let env = TestEnv::new().await;
    let path = env.dir.path().join("blank.txt");
    std::fs::write(&path, b"").unwrap();

    let response = commands::open_document(&env.state, &path).await;
    assert_eq!(response.error.as_deref(), Some(UPLOAD_FAILED_MESSAGE));
}
