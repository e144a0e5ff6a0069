//! Analysis service client.
//!
//! This module sends a [`LabResultRequest`] to the remote analysis service and
//! returns its verdict. The service is opaque: the client posts JSON, checks
//! the status, and deserializes the body. It never retries on its own; a retry
//! is a new call made by the user.
//!
//! Failures are reported as an [`AnalysisError`] with one of two kinds:
//!
//! - `Server`: the service answered with a non-success status
//! - `Connection`: anything else (transport failure or unreadable body)

pub mod config;
pub mod error;

pub use config::ClientConfig;
pub use error::{AnalysisError, AnalysisErrorKind, CONNECTION_ERROR_MESSAGE};

use crate::models::{LabResultRequest, LabResultResponse};
use log::{debug, info, warn};
use std::time::Instant;

/// HTTP client for the analysis endpoint.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl AnalysisClient {
    /// Creates a client for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a connection error if the HTTP client cannot be initialized
    /// (for example when the TLS backend fails to load).
    pub fn new(config: ClientConfig) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout_duration())
            .build()
            .map_err(|e| {
                warn!("Failed to build HTTP client: {}", e);
                AnalysisError::connection()
            })?;

        Ok(Self { http, config })
    }

    /// Creates a client from the global configuration.
    pub fn from_global_config() -> Result<Self, AnalysisError> {
        Self::new(ClientConfig::default())
    }

    /// Returns the endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Sends a lab result to the analysis service.
    ///
    /// # Arguments
    ///
    /// * `request` - The lab result to analyse
    ///
    /// # Returns
    ///
    /// The service's verdict on success.
    ///
    /// # Errors
    ///
    /// - `AnalysisErrorKind::Server` when the status is not 2xx; the message
    ///   contains the status code and reason
    /// - `AnalysisErrorKind::Connection` for transport failures and bodies that
    ///   do not deserialize into a [`LabResultResponse`]
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use lab_insight::client::{AnalysisClient, ClientConfig};
    /// use lab_insight::models::{Gender, LabResultRequest};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = AnalysisClient::new(ClientConfig::default())?;
    /// let request = LabResultRequest::new("Glucose", 110.0, 40.0, Gender::Male).unwrap();
    ///
    /// let response = client.explain(&request).await?;
    /// println!("{}: {}", response.parameter, response.risk_label());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn explain(
        &self,
        request: &LabResultRequest,
    ) -> Result<LabResultResponse, AnalysisError> {
        let start = Instant::now();
        debug!(
            "POST {} ({} = {} {})",
            self.config.endpoint, request.parameter, request.value, request.unit
        );

        let response = self
            .http
            .post(&self.config.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!("Analysis request to {} failed: {}", self.config.endpoint, e);
                AnalysisError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                "Analysis service returned {} after {:?}",
                status,
                start.elapsed()
            );
            return Err(AnalysisError::server(
                status.as_u16(),
                status.canonical_reason(),
            ));
        }

        let verdict = response
            .json::<LabResultResponse>()
            .await
            .map_err(|e| {
                warn!("Could not decode analysis response: {}", e);
                AnalysisError::connection()
            })?;

        info!(
            "Analysis for {} completed in {:?}: {}",
            verdict.parameter,
            start.elapsed(),
            verdict.risk_label()
        );

        Ok(verdict)
    }
}
