//! Settings Models
//!
//! Application configuration and settings data structures.

use draftcheck_core::ProxyConfig;
use draftcheck_llm::DEFAULT_MODEL;
use serde::{Deserialize, Serialize};

/// Application configuration stored in config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gemini model used for every analysis call
    pub model: String,
    /// Override for the model service base URL
    #[serde(default)]
    pub base_url: Option<String>,
    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Sampling temperature for every request
    pub temperature: f32,
    /// Characters of the document sent for source verification
    pub source_prefix_chars: usize,
    /// Characters of the document sent for AI-authorship detection
    pub ai_detection_prefix_chars: usize,
    /// AI score strictly above which a scan opens the AI check tab
    pub ai_tab_threshold: u8,
    /// Outbound proxy; the password lives in the keyring
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            request_timeout_secs: 120,
            temperature: 0.2,
            source_prefix_chars: 1000,
            ai_detection_prefix_chars: 2000,
            ai_tab_threshold: 80,
            proxy: None,
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub temperature: Option<f32>,
    pub source_prefix_chars: Option<usize>,
    pub ai_detection_prefix_chars: Option<usize>,
    pub ai_tab_threshold: Option<u8>,
    pub proxy: Option<ProxyConfig>,
    /// Drop the configured proxy
    #[serde(default)]
    pub clear_proxy: bool,
}

/// Keys accepted by `SettingsUpdate::from_key_value`
pub const SETTING_KEYS: &[&str] = &[
    "model",
    "base_url",
    "request_timeout_secs",
    "temperature",
    "source_prefix_chars",
    "ai_detection_prefix_chars",
    "ai_tab_threshold",
    "proxy",
];

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("Invalid value for {}: {}", key, value))
}

impl SettingsUpdate {
    /// Build a single-field update from a `key value` pair.
    ///
    /// `proxy` takes a URL such as `socks5://user@host:1080`, or `none` to
    /// remove the proxy.
    pub fn from_key_value(key: &str, value: &str) -> Result<Self, String> {
        let mut update = Self::default();
        match key {
            "model" => update.model = Some(value.trim().to_string()),
            "base_url" => update.base_url = Some(value.trim().to_string()),
            "request_timeout_secs" => update.request_timeout_secs = Some(parse_number(key, value)?),
            "temperature" => update.temperature = Some(parse_number(key, value)?),
            "source_prefix_chars" => update.source_prefix_chars = Some(parse_number(key, value)?),
            "ai_detection_prefix_chars" => {
                update.ai_detection_prefix_chars = Some(parse_number(key, value)?)
            }
            "ai_tab_threshold" => update.ai_tab_threshold = Some(parse_number(key, value)?),
            "proxy" if value.trim().eq_ignore_ascii_case("none") => update.clear_proxy = true,
            "proxy" => {
                update.proxy = Some(ProxyConfig::from_url(value).map_err(|e| e.to_string())?)
            }
            other => {
                return Err(format!(
                    "Unknown setting '{}'. Known settings: {}",
                    other,
                    SETTING_KEYS.join(", ")
                ))
            }
        }
        Ok(update)
    }
}

impl AppConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(model) = update.model {
            self.model = model;
        }
        if let Some(base_url) = update.base_url {
            // An empty value restores the public endpoint
            self.base_url = if base_url.trim().is_empty() {
                None
            } else {
                Some(base_url)
            };
        }
        if let Some(timeout) = update.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
        if let Some(temperature) = update.temperature {
            self.temperature = temperature;
        }
        if let Some(prefix) = update.source_prefix_chars {
            self.source_prefix_chars = prefix;
        }
        if let Some(prefix) = update.ai_detection_prefix_chars {
            self.ai_detection_prefix_chars = prefix;
        }
        if let Some(threshold) = update.ai_tab_threshold {
            self.ai_tab_threshold = threshold;
        }
        if update.clear_proxy {
            self.proxy = None;
        } else if let Some(proxy) = update.proxy {
            self.proxy = Some(proxy);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }

        if !(1..=600).contains(&self.request_timeout_secs) {
            return Err(format!(
                "request_timeout_secs must be between 1 and 600, got {}",
                self.request_timeout_secs
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }

        if self.source_prefix_chars == 0 || self.ai_detection_prefix_chars == 0 {
            return Err("prefix lengths must be at least 1 character".to_string());
        }

        if self.ai_tab_threshold > 100 {
            return Err(format!(
                "ai_tab_threshold cannot exceed 100, got {}",
                self.ai_tab_threshold
            ));
        }

        if let Some(proxy) = &self.proxy {
            if proxy.host.trim().is_empty() {
                return Err("proxy host must not be empty".to_string());
            }
        }

        Ok(())
    }
}
