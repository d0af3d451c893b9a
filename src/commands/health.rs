//! Health Check Commands
//!
//! Commands for checking the health status of configuration, credentials
//! and the model service.

use crate::models::response::{CommandResponse, CredentialSource, HealthResponse};
use crate::state::AppState;

/// Get the health status of all backend services.
///
/// With `probe` set, a tiny request is sent to the model service to check
/// that the key is accepted.
pub async fn get_health(state: &AppState, probe: bool) -> CommandResponse<HealthResponse> {
    let mut health = HealthResponse {
        config: state.is_config_healthy(),
        ..Default::default()
    };

    let (_, source) = state.resolve_api_key();
    health.credential = source != CredentialSource::Missing;

    if let Ok(config) = state.get_config().await {
        health.model = config.model;
    }

    if probe && health.credential {
        match state.build_gateway().await {
            Ok(gateway) => match gateway.health_check().await {
                Ok(()) => health.model_service = true,
                Err(e) => tracing::warn!(error = %e, "Model service health check failed"),
            },
            Err(e) => tracing::warn!(error = %e, "Could not build model gateway"),
        }
    }

    let service_ok = !probe || health.model_service;
    health.status = if health.config && health.credential && service_ok {
        "healthy".to_string()
    } else {
        "degraded".to_string()
    };

    CommandResponse::ok(health)
}
