//! Analysis client error types.
//!
//! Every failure of an analysis call is reduced to one of two kinds so the
//! caller can show a single message and offer a retry.

use std::fmt;

/// Message shown for any transport or decoding failure.
pub const CONNECTION_ERROR_MESSAGE: &str =
    "Connection to the analysis server failed. Please check that the backend is running.";

/// The category of an analysis failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisErrorKind {
    /// Network or transport failure, or a response body that could not be read.
    ///
    /// Covers DNS errors, refused connections, timeouts, dropped connections
    /// and malformed JSON.
    Connection,

    /// The service answered with a non-success HTTP status.
    Server,
}

/// Error returned by [`AnalysisClient::explain`](super::AnalysisClient::explain).
///
/// `message` is ready for display. Server errors include the status code and
/// reason phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisError {
    pub kind: AnalysisErrorKind,
    pub message: String,
}

impl AnalysisError {
    /// Creates a connection error carrying the generic connectivity message.
    pub fn connection() -> Self {
        Self {
            kind: AnalysisErrorKind::Connection,
            message: CONNECTION_ERROR_MESSAGE.to_string(),
        }
    }

    /// Creates a server error for a non-success status.
    ///
    /// # Arguments
    ///
    /// * `status_code` - HTTP status code returned by the service
    /// * `reason` - Reason phrase for the status, if known
    pub fn server(status_code: u16, reason: Option<&str>) -> Self {
        let message = match reason {
            Some(reason) => format!("Server error: {} {}", status_code, reason),
            None => format!("Server error: {}", status_code),
        };
        Self {
            kind: AnalysisErrorKind::Server,
            message,
        }
    }

    pub fn is_connection(&self) -> bool {
        self.kind == AnalysisErrorKind::Connection
    }

    pub fn is_server(&self) -> bool {
        self.kind == AnalysisErrorKind::Server
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AnalysisError {}

/// Convert reqwest errors to AnalysisError.
///
/// Status errors keep their code; everything else (connect, timeout,
/// body and decode failures) is a connection error.
impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => AnalysisError::server(status.as_u16(), status.canonical_reason()),
            None => AnalysisError::connection(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_message() {
        let err = AnalysisError::server(500, Some("Internal Server Error"));
        assert_eq!(err.kind, AnalysisErrorKind::Server);
        assert_eq!(format!("{}", err), "Server error: 500 Internal Server Error");

        let err = AnalysisError::server(599, None);
        assert_eq!(err.message, "Server error: 599");
        assert!(err.is_server());
    }

    #[test]
    fn test_connection_error_message() {
        let err = AnalysisError::connection();
        assert!(err.is_connection());
        assert_eq!(err.message, CONNECTION_ERROR_MESSAGE);
    }

    #[test]
    fn test_error_is_error_trait() {
        let err: &dyn std::error::Error = &AnalysisError::connection();
        assert!(format!("{}", err).contains("Connection"));
    }
}
