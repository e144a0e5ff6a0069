//! Data models for analysis history.
//!
//! This module defines the record kept for every successful analysis and
//! the errors that persistence can produce.

use crate::models::{LabResultRequest, LabResultResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single entry in the analysis history.
///
/// Pairs a submitted request with the verdict received for it. Entries are
/// created once per successful analysis and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisHistoryEntry {
    /// Unique identifier for this history entry.
    ///
    /// Generated using UUID v4 for guaranteed uniqueness.
    pub id: String,

    /// The lab result that was submitted.
    pub request: LabResultRequest,

    /// The verdict returned by the analysis service.
    pub response: LabResultResponse,

    /// When the verdict was received by this client.
    ///
    /// Stored in UTC and serialized as ISO-8601.
    pub date: DateTime<Utc>,
}

impl AnalysisHistoryEntry {
    /// Creates a new history entry stamped with the current time.
    ///
    /// # Arguments
    ///
    /// * `request` - The lab result that was submitted
    /// * `response` - The verdict that was received
    ///
    /// # Returns
    ///
    /// A new `AnalysisHistoryEntry` with a unique ID and current timestamp.
    pub fn new(request: LabResultRequest, response: LabResultResponse) -> Self {
        Self::with_date(request, response, Utc::now())
    }

    /// Creates a new history entry with an explicit receipt time.
    pub fn with_date(
        request: LabResultRequest,
        response: LabResultResponse,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            request,
            response,
            date,
        }
    }

    /// Returns the parameter this entry measured.
    pub fn parameter(&self) -> &str {
        &self.request.parameter
    }
}

/// Errors that can occur during history persistence.
#[derive(Debug)]
pub enum HistoryError {
    /// Error occurred during storage operations (file I/O).
    ///
    /// Contains the underlying I/O error for detailed diagnostics.
    StorageError(std::io::Error),

    /// Error occurred during serialization or deserialization.
    ///
    /// Contains the underlying serde_json error.
    SerializationError(serde_json::Error),
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::StorageError(err) => {
                write!(f, "History storage error: {}", err)
            }
            HistoryError::SerializationError(err) => {
                write!(f, "History serialization error: {}", err)
            }
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoryError::StorageError(err) => Some(err),
            HistoryError::SerializationError(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for HistoryError {
    fn from(err: std::io::Error) -> Self {
        HistoryError::StorageError(err)
    }
}

impl From<serde_json::Error> for HistoryError {
    fn from(err: serde_json::Error) -> Self {
        HistoryError::SerializationError(err)
    }
}
