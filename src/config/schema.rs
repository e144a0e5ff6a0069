//! Configuration schema for Lab Insight.
//!
//! This module defines the configuration structure and validation logic for
//! all user-configurable settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default analysis endpoint.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1/lab-results/explain";

/// Default number of analyses kept in history.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Main configuration structure.
///
/// All settings can be configured in a JSON settings document under the
/// "lab-insight" key. Missing settings fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabInsightConfig {
    /// URL of the analysis endpoint that receives lab results.
    ///
    /// Must be an absolute http or https URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in milliseconds.
    ///
    /// Maximum time to wait for the analysis service, including connection
    /// and body download. Defaults to 30000ms (30 seconds).
    ///
    /// Must be greater than 0.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Maximum number of analyses to keep in history.
    ///
    /// The oldest analyses are dropped once the limit is reached.
    /// Defaults to 50.
    ///
    /// Must be > 0.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Directory holding persisted state.
    ///
    /// When unset, a per-user directory under the home config directory
    /// is used.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Default for LabInsightConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout: default_timeout(),
            history_limit: default_history_limit(),
            data_dir: None,
        }
    }
}

impl LabInsightConfig {
    /// Validates the configuration and returns errors if any settings are invalid.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all settings are valid, or `Err` with a descriptive error message.
    pub fn validate(&self) -> Result<(), String> {
        match url::Url::parse(&self.api_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => {
                return Err(format!(
                    "apiUrl must use http or https, got '{}'",
                    url.scheme()
                ))
            }
            Err(e) => return Err(format!("apiUrl is not a valid URL: {}", e)),
        }

        if self.timeout == 0 {
            return Err("timeout must be greater than 0".to_string());
        }

        if self.history_limit == 0 {
            return Err("historyLimit must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Merges this configuration with another, using values from `other` where present.
    ///
    /// # Arguments
    ///
    /// * `other` - Configuration to merge with (takes precedence)
    ///
    /// # Returns
    ///
    /// A new `LabInsightConfig` with merged values.
    pub fn merge(&self, other: &LabInsightConfig) -> Self {
        Self {
            api_url: other.api_url.clone(),
            timeout: other.timeout,
            history_limit: other.history_limit,
            data_dir: other.data_dir.clone().or_else(|| self.data_dir.clone()),
        }
    }
}

// Default value functions for serde

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> u64 {
    30000 // 30 seconds in milliseconds
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}
