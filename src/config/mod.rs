//! Configuration management for Lab Insight.
//!
//! This module provides configuration loading, validation, and access through a singleton pattern.
//! Configuration is read from a JSON settings document under the "lab-insight" key, merged with
//! defaults, and finally overridden by the environment.

pub mod schema;

pub use schema::{LabInsightConfig, DEFAULT_API_URL, DEFAULT_HISTORY_LIMIT};

use log::warn;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::path::Path;
use std::sync::RwLock;

/// Key of the settings section read by [`load_config`].
pub const SETTINGS_KEY: &str = "lab-insight";

/// Environment variable that overrides the analysis endpoint.
pub const API_URL_ENV: &str = "LAB_INSIGHT_API_URL";

/// Global configuration instance.
///
/// This is lazily initialized on first access and replaced when settings are loaded.
static CONFIG: Lazy<RwLock<LabInsightConfig>> =
    Lazy::new(|| RwLock::new(LabInsightConfig::default()));

/// Loads configuration from a JSON settings value.
///
/// This function reads the "lab-insight" settings, merges them with defaults,
/// applies the `LAB_INSIGHT_API_URL` override, validates the result, and
/// updates the global configuration.
///
/// # Arguments
///
/// * `settings_json` - Optional JSON value containing user settings under "lab-insight" key
///
/// # Returns
///
/// `Ok(LabInsightConfig)` with the loaded configuration, or `Err` if validation fails.
///
/// # Example
///
/// ```no_run
/// use lab_insight::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "lab-insight": {
///         "apiUrl": "https://labs.example.org/api/v1/lab-results/explain",
///         "timeout": 10000
///     }
/// });
///
/// let config = load_config(Some(settings)).unwrap();
/// assert_eq!(config.timeout, 10000);
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<LabInsightConfig, String> {
    let mut config = LabInsightConfig::default();

    if let Some(settings) = settings_json {
        if let Some(user_settings) = settings.get(SETTINGS_KEY) {
            match serde_json::from_value::<LabInsightConfig>(user_settings.clone()) {
                Ok(user_config) => {
                    config = config.merge(&user_config);
                }
                Err(e) => {
                    // Keep going with defaults
                    warn!(
                        "Failed to parse {} settings: {}. Using defaults.",
                        SETTINGS_KEY, e
                    );
                }
            }
        }
    }

    if let Ok(url) = std::env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            config.api_url = url.trim().to_string();
        }
    }

    config
        .validate()
        .map_err(|e| format!("Invalid configuration: {}", e))?;

    if let Ok(mut global_config) = CONFIG.write() {
        *global_config = config.clone();
    }

    Ok(config)
}

/// Loads configuration from a JSON settings file.
///
/// A missing file is treated like an empty settings document.
///
/// # Errors
///
/// Returns `Err` if the file exists but cannot be read or parsed, or if the
/// resulting configuration is invalid.
pub fn load_config_file(path: &Path) -> Result<LabInsightConfig, String> {
    if !path.exists() {
        return load_config(None);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let settings: Value = serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

    load_config(Some(settings))
}

/// Gets the current global configuration.
///
/// Returns a clone of the current configuration, or the defaults if nothing
/// has been loaded yet.
pub fn get_config() -> LabInsightConfig {
    CONFIG
        .read()
        .map(|c| c.clone())
        .unwrap_or_else(|_| LabInsightConfig::default())
}

/// Updates a specific configuration setting.
///
/// The update is rejected (and the previous configuration kept) if it
/// produces an invalid configuration.
///
/// # Example
///
/// ```no_run
/// use lab_insight::config::update_config;
///
/// update_config(|config| {
///     config.history_limit = 20;
/// });
/// ```
pub fn update_config<F>(updater: F)
where
    F: FnOnce(&mut LabInsightConfig),
{
    if let Ok(mut config) = CONFIG.write() {
        let mut updated = config.clone();
        updater(&mut updated);

        match updated.validate() {
            Ok(()) => *config = updated,
            Err(e) => warn!("Ignoring invalid configuration update: {}", e),
        }
    }
}

/// Resets the configuration to defaults.
pub fn reset_config() {
    if let Ok(mut config) = CONFIG.write() {
        *config = LabInsightConfig::default();
    }
}
