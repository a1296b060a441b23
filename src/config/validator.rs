//! Configuration validation with aggregated errors.

use std::path::Path;

use tracing::error;

use crate::config::types::{CoreConfig, HttpConfig, LoggingConfig, SettingsStoreConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_core_config(cfg: &CoreConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings_store(&cfg.settings, &mut errors);
    validate_http(&cfg.http, &mut errors);
    validate_logging(&cfg.logging, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        for e in &errors {
            error!("config validation: {}", e);
        }
        Err(errors)
    }
}

fn validate_settings_store(cfg: &SettingsStoreConfig, errors: &mut Vec<String>) {
    let namespace = cfg.namespace.trim();
    if namespace.is_empty() {
        errors.push("settings.namespace must not be empty".to_string());
    } else if namespace.starts_with('.') || namespace.ends_with('.') {
        errors.push(format!(
            "settings.namespace '{}' must not start or end with '.'",
            cfg.namespace
        ));
    }

    if let Some(path) = &cfg.store_path {
        if !Path::new(path).is_absolute() {
            errors.push(format!("settings.store_path '{}' is relative; use an absolute path", path));
        }
    }
}

fn validate_http(cfg: &HttpConfig, errors: &mut Vec<String>) {
    if cfg.timeout_ms == 0 {
        errors.push("http.timeout_ms must be greater than 0".to_string());
    }
    if cfg
        .partner_attribution_id
        .as_ref()
        .is_some_and(|id| id.trim().is_empty())
    {
        errors.push("http.partner_attribution_id must not be blank when set".to_string());
    }
}

fn validate_logging(cfg: &LoggingConfig, errors: &mut Vec<String>) {
    if !LOG_LEVELS.contains(&cfg.level.to_lowercase().as_str()) {
        errors.push(format!(
            "logging.level '{}' is not one of {:?}",
            cfg.level, LOG_LEVELS
        ));
    }
}
