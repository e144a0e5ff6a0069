//! Analysis client configuration.

use crate::config::{get_config, LabInsightConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for talking to the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Endpoint that receives `POST` requests with a lab result.
    pub endpoint: String,

    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl ClientConfig {
    /// Creates a ClientConfig for the given endpoint and timeout.
    pub fn new(endpoint: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_ms,
        }
    }

    /// Returns the timeout as a `std::time::Duration`.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl From<&LabInsightConfig> for ClientConfig {
    fn from(config: &LabInsightConfig) -> Self {
        Self {
            endpoint: config.api_url.clone(),
            timeout_ms: config.timeout,
        }
    }
}

impl Default for ClientConfig {
    /// Creates a default ClientConfig using global configuration.
    fn default() -> Self {
        Self::from(&get_config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_API_URL;

    #[test]
    fn test_client_config_new() {
        let config = ClientConfig::new("http://127.0.0.1:9999/explain", 2500);
        assert_eq!(config.endpoint, "http://127.0.0.1:9999/explain");
        assert_eq!(config.timeout_duration(), Duration::from_millis(2500));
    }

    #[test]
    fn test_from_lab_insight_config() {
        let config = ClientConfig::from(&LabInsightConfig::default());
        assert_eq!(config.endpoint, DEFAULT_API_URL);
        assert_eq!(config.timeout_ms, 30000);
    }
}
