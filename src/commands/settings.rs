//! Settings Commands
//!
//! Commands for reading and updating application settings and the stored
//! Gemini credential.

use crate::models::response::{AuthStatus, CommandResponse};
use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::state::AppState;

/// Get current application settings
pub async fn get_settings(state: &AppState) -> CommandResponse<AppConfig> {
    match state.get_config().await {
        Ok(config) => CommandResponse::ok(config),
        Err(e) => CommandResponse::err(e.to_string()),
    }
}

/// Update application settings with a partial update
pub async fn update_settings(state: &AppState, update: SettingsUpdate) -> CommandResponse<AppConfig> {
    match state.update_config(update).await {
        Ok(config) => {
            state.reset_gateway().await;
            CommandResponse::ok(config)
        }
        Err(e) => CommandResponse::err(e.to_string()),
    }
}

/// Restore default settings
pub async fn reset_settings(state: &AppState) -> CommandResponse<AppConfig> {
    match state.reset_config().await {
        Ok(config) => {
            state.reset_gateway().await;
            CommandResponse::ok(config)
        }
        Err(e) => CommandResponse::err(e.to_string()),
    }
}

/// Where the Gemini key comes from, with its last four characters
pub async fn get_auth_status(state: &AppState) -> CommandResponse<AuthStatus> {
    let (key, source) = state.resolve_api_key();
    let hint = key.map(|k| {
        let chars: Vec<char> = k.chars().collect();
        let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
        format!("…{}", tail)
    });
    CommandResponse::ok(AuthStatus { source, hint })
}

/// Store the Gemini key in the OS keyring
pub async fn set_api_key(state: &AppState, key: &str) -> CommandResponse<AuthStatus> {
    if let Err(e) = state.set_api_key(key) {
        return CommandResponse::err(e.to_string());
    }
    state.reset_gateway().await;
    get_auth_status(state).await
}

/// Remove the Gemini key from the OS keyring
pub async fn clear_api_key(state: &AppState) -> CommandResponse<AuthStatus> {
    if let Err(e) = state.delete_api_key() {
        return CommandResponse::err(e.to_string());
    }
    state.reset_gateway().await;
    get_auth_status(state).await
}
