//! Settings persistence, credential reporting and health.

use draftcheck::commands;
use draftcheck::models::response::CredentialSource;
use draftcheck::{AppConfig, AppState, SettingsUpdate};

use crate::common::*;

#[tokio::test]
async fn test_settings_persist_across_states() {
    let env = TestEnv::new().await;
    let update = SettingsUpdate {
        temperature: Some(0.7),
        ai_tab_threshold: Some(65),
        ..Default::default()
    };
    assert!(commands::update_settings(&env.state, update).await.success);

    let reopened = AppState::new().with_config_path(env.dir.path().join("config.json"));
    reopened.initialize().await.unwrap();
    let config = commands::get_settings(&reopened).await.data.unwrap();
    assert_eq!(config.model, MODEL);
    assert_eq!(config.base_url, Some(env.server.base_url()));
    assert_eq!(config.temperature, 0.7);
    assert_eq!(config.ai_tab_threshold, 65);
}

#[tokio::test]
async fn test_invalid_update_leaves_config_alone() {
    let env = TestEnv::new().await;
    let before = commands::get_settings(&env.state).await.data.unwrap();

    let update = SettingsUpdate {
        temperature: Some(7.5),
        ..Default::default()
    };
    let response = commands::update_settings(&env.state, update).await;
    assert!(!response.success);
    assert_eq!(commands::get_settings(&env.state).await.data.unwrap(), before);
}

#[tokio::test]
async fn test_key_value_update_and_reset() {
    let env = TestEnv::new().await;
    let update = SettingsUpdate::from_key_value("ai_tab_threshold", "50").unwrap();
    let config = commands::update_settings(&env.state, update).await.data.unwrap();
    assert_eq!(config.ai_tab_threshold, 50);

    let config = commands::reset_settings(&env.state).await.data.unwrap();
    assert_eq!(config, AppConfig::default());
}

#[tokio::test]
async fn test_lowered_threshold_applies_to_next_scan() {
    let env = TestEnv::new().await;
    env.script_scan(one_suggestion(), 60).await;

    let update = SettingsUpdate::from_key_value("ai_tab_threshold", "50").unwrap();
    assert!(commands::update_settings(&env.state, update).await.success);

    commands::open_text(&env.state, "draft.txt", DRAFT).await;
    let report = commands::run_full_scan(&env.state).await.data.unwrap();
    assert_eq!(report.session.active_tab.as_str(), "ai_check");
}

#[tokio::test]
async fn test_explicit_key_reported_with_hint() {
    let env = TestEnv::new().await;
    let status = commands::get_auth_status(&env.state).await.data.unwrap();
    assert_eq!(status.source, CredentialSource::Explicit);
    assert_eq!(status.hint.as_deref(), Some("…-key"));
}

#[tokio::test]
async fn test_health_probe_reaches_service() {
    let env = TestEnv::new().await;
    let probe = env.reply("single word", "ok").await;

    let health = commands::get_health(&env.state, true).await.data.unwrap();
    assert_eq!(health.status, "healthy");
    assert!(health.model_service);
    assert_eq!(health.model, MODEL);
    probe.assert_calls_async(1).await;
}

#[tokio::test]
async fn test_health_probe_rejected_key() {
    let env = TestEnv::new().await;
    env.server
        .mock_async(|when, then| {
            when.path(ENDPOINT);
            then.status(401).body("unauthorized");
        })
        .await;

    let health = commands::get_health(&env.state, true).await.data.unwrap();
    assert_eq!(health.status, "degraded");
    assert!(!health.model_service);
}

#[tokio::test]
async fn test_settings_change_keeps_document_and_results() {
    let env = TestEnv::new().await;
    env.script_scan(one_suggestion(), 20).await;

    commands::open_text(&env.state, "draft.txt", DRAFT).await;
    let before = commands::run_full_scan(&env.state).await.data.unwrap().session;
    assert_eq!(before.analysis.suggestions.len(), 1);

    let update = SettingsUpdate {
        temperature: Some(0.5),
        ..Default::default()
    };
    assert!(commands::update_settings(&env.state, update).await.success);
    assert!(commands::reset_settings(&env.state).await.success);

    let after = commands::get_session(&env.state).await.data.unwrap();
    assert_eq!(after.document, before.document);
    assert_eq!(after.document.text, DRAFT);
    assert_eq!(after.analysis.suggestions, before.analysis.suggestions);
    assert_eq!(after.analysis.summary, before.analysis.summary);
    assert_eq!(after.analysis.sources.len(), 2);
}
