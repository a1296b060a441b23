use serde::Deserialize;

use crate::utils::constants::{
    DEFAULT_HTTP_TIMEOUT_MS, DEFAULT_SAFETY_MARGIN_SECS, DEFAULT_SETTINGS_NAMESPACE,
};

/// ================================
/// Full library configuration
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CoreConfig {
    #[serde(default)]
    pub settings: SettingsStoreConfig,
    #[serde(default)]
    pub token: TokenConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// ================================
/// Settings store
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct SettingsStoreConfig {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// YAML file backing the store; in-memory when absent
    pub store_path: Option<String>,
}

impl Default for SettingsStoreConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            store_path: None,
        }
    }
}

/// ================================
/// Token resource
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    /// seconds before the server-declared expiry the cache stops serving a token
    #[serde(default = "default_safety_margin_seconds")]
    pub safety_margin_seconds: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            safety_margin_seconds: default_safety_margin_seconds(),
        }
    }
}

/// ================================
/// HTTP client
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    pub partner_attribution_id: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            partner_attribution_id: None,
        }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String, // allowed: trace, debug, info, warn, error
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new(default_log_level(), LogFormat::default())
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Compact,
}

fn default_namespace() -> String {
    DEFAULT_SETTINGS_NAMESPACE.to_owned()
}

fn default_safety_margin_seconds() -> u64 {
    DEFAULT_SAFETY_MARGIN_SECS
}

fn default_timeout_ms() -> u64 {
    DEFAULT_HTTP_TIMEOUT_MS
}

fn default_log_level() -> String {
    "info".to_owned()
}
