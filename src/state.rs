//! Application State
//!
//! Process-wide state: configuration, credentials, and the active document
//! session. Command handlers receive a reference to this.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use draftcheck_llm::{build_http_client, GeminiProvider, ProviderConfig};
use tokio::sync::RwLock;

use crate::models::document::Document;
use crate::models::response::CredentialSource;
use crate::models::session::SessionState;
use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::services::gateway::{GatewaySettings, ModelGateway};
use crate::services::orchestrator::SharedSession;
use crate::services::session::DocumentSession;
use crate::storage::{ConfigService, KeyringService, PROXY_ACCOUNT};
use crate::utils::error::{AppError, AppResult};

/// Environment variables checked for the Gemini key, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Application state shared by all command handlers
pub struct AppState {
    /// Keyring service for secure secret storage
    keyring: KeyringService,
    /// Configuration service for app settings
    config: Arc<RwLock<Option<ConfigService>>>,
    /// Document, selection and results; outlives gateway rebuilds
    document: SharedSession,
    /// Gateway and orchestrator around `document`, built on first use
    session: Arc<RwLock<Option<Arc<DocumentSession>>>>,
    /// Config file location; `None` means ~/.draftcheck/config.json
    config_path: Option<PathBuf>,
    /// Key supplied directly, ahead of env and keyring
    api_key_override: Option<String>,
    /// Whether the state has been initialized
    initialized: Arc<RwLock<bool>>,
}

impl AppState {
    /// Create a new uninitialized app state
    pub fn new() -> Self {
        Self {
            keyring: KeyringService::new(),
            config: Arc::new(RwLock::new(None)),
            document: Arc::new(RwLock::new(SessionState::new(Document::sample()))),
            session: Arc::new(RwLock::new(None)),
            config_path: None,
            api_key_override: None,
            initialized: Arc::new(RwLock::new(false)),
        }
    }

    /// Use a config file other than the default
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Use this API key regardless of environment or keyring
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key_override = Some(key.into());
        self
    }

    /// Initialize all services
    pub async fn initialize(&self) -> AppResult<()> {
        let mut initialized = self.initialized.write().await;
        if *initialized {
            return Ok(());
        }

        let service = match &self.config_path {
            Some(path) => ConfigService::open(path)?,
            None => ConfigService::new()?,
        };
        tracing::debug!(path = %service.path().display(), "Loaded configuration");
        *self.config.write().await = Some(service);

        *initialized = true;
        Ok(())
    }

    /// Check if keyring is healthy
    pub fn is_keyring_healthy(&self) -> bool {
        self.keyring.is_healthy()
    }

    /// Check if config is healthy
    pub fn is_config_healthy(&self) -> bool {
        if let Ok(guard) = self.config.try_read() {
            if let Some(ref config) = *guard {
                return config.is_healthy();
            }
        }
        false
    }

    /// Get the current configuration
    pub async fn get_config(&self) -> AppResult<AppConfig> {
        let guard = self.config.read().await;
        match &*guard {
            Some(config) => Ok(config.get_config_clone()),
            None => Err(AppError::config("Config service not initialized")),
        }
    }

    /// Update the configuration
    pub async fn update_config(&self, update: SettingsUpdate) -> AppResult<AppConfig> {
        let mut guard = self.config.write().await;
        match &mut *guard {
            Some(config) => config.update_config(update),
            None => Err(AppError::config("Config service not initialized")),
        }
    }

    /// Reset the configuration to defaults
    pub async fn reset_config(&self) -> AppResult<AppConfig> {
        let mut guard = self.config.write().await;
        match &mut *guard {
            Some(config) => {
                config.reset()?;
                Ok(config.get_config_clone())
            }
            None => Err(AppError::config("Config service not initialized")),
        }
    }

    /// Find the Gemini key: explicit override, then env vars, then keyring.
    ///
    /// A keyring failure is logged and treated as "no key"; a missing key
    /// only becomes an error when a model call is made.
    pub fn resolve_api_key(&self) -> (Option<String>, CredentialSource) {
        if let Some(key) = self.api_key_override.as_ref().filter(|k| !k.trim().is_empty()) {
            return (Some(key.clone()), CredentialSource::Explicit);
        }
        for var in API_KEY_ENV_VARS {
            if let Ok(key) = std::env::var(var) {
                if !key.trim().is_empty() {
                    return (Some(key), CredentialSource::Environment);
                }
            }
        }
        match self.keyring.gemini_key() {
            Ok(Some(key)) => (Some(key), CredentialSource::Keyring),
            Ok(None) => (None, CredentialSource::Missing),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read Gemini key from keyring");
                (None, CredentialSource::Missing)
            }
        }
    }

    /// Store the Gemini key in the keyring
    pub fn set_api_key(&self, key: &str) -> AppResult<()> {
        self.keyring.set_gemini_key(key)
    }

    /// Delete the Gemini key from the keyring
    pub fn delete_api_key(&self) -> AppResult<()> {
        self.keyring.delete_gemini_key()
    }

    /// Store the proxy password in the keyring
    pub fn set_proxy_password(&self, password: &str) -> AppResult<()> {
        self.keyring.set_secret(PROXY_ACCOUNT, password)
    }

    /// Build a gateway from the current config and credential
    pub async fn build_gateway(&self) -> AppResult<ModelGateway> {
        let config = self.get_config().await?;
        let (api_key, source) = self.resolve_api_key();

        let mut proxy = config.proxy.clone();
        if let Some(p) = proxy.as_mut() {
            if p.username.is_some() && p.password.is_none() {
                p.password = self.keyring.get_secret(PROXY_ACCOUNT).unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Could not read proxy password from keyring");
                    None
                });
            }
        }

        let client = build_http_client(
            proxy.as_ref(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        let provider = GeminiProvider::with_client(
            ProviderConfig {
                api_key,
                base_url: config.base_url.clone(),
                model: config.model.clone(),
                max_output_tokens: None,
                temperature: config.temperature,
            },
            client,
        );

        tracing::debug!(
            model = %config.model,
            credential = ?source,
            proxy = proxy.is_some(),
            "Built model gateway"
        );
        Ok(ModelGateway::new(Arc::new(provider), GatewaySettings::from(&config)))
    }

    /// The active document session; the gateway is built on first use
    pub async fn session(&self) -> AppResult<Arc<DocumentSession>> {
        if let Some(session) = self.session.read().await.as_ref() {
            return Ok(session.clone());
        }

        let mut guard = self.session.write().await;
        if let Some(session) = guard.as_ref() {
            return Ok(session.clone());
        }
        let config = self.get_config().await?;
        let gateway = Arc::new(self.build_gateway().await?);
        let session = Arc::new(DocumentSession::attach(
            self.document.clone(),
            gateway,
            config.ai_tab_threshold,
        ));
        *guard = Some(session.clone());
        Ok(session)
    }

    /// Drop the gateway so the next command rebuilds it from the current
    /// config and credential. The document and results are kept.
    pub async fn reset_gateway(&self) {
        *self.session.write().await = None;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("initialized", &self.initialized)
            .field("config_path", &self.config_path)
            .finish()
    }
}
