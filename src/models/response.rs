//! Lab result response data models.
//!
//! The analysis service owns the content of these values. The client only
//! requires that the body deserializes; it never second-guesses the verdict.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Risk classification assigned by the analysis service.
///
/// Parsing is lenient. The canonical labels and the German labels used by
/// earlier service versions map onto the known variants; anything else,
/// including non-string JSON values, is kept verbatim in [`RiskLevel::Other`]
/// so it can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RiskLevel {
    /// Value is within the reference range.
    Normal,
    /// Value is slightly outside the reference range.
    SlightlyElevated,
    /// Value needs prompt medical attention.
    Critical,
    /// Label not recognized by this client.
    Other(String),
}

impl RiskLevel {
    /// Returns the canonical wire label for this risk level.
    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::Normal => "NORMAL",
            RiskLevel::SlightlyElevated => "SLIGHTLY_ELEVATED",
            RiskLevel::Critical => "CRITICAL",
            RiskLevel::Other(label) => label,
        }
    }

    /// Parses a service label. Never fails.
    pub fn from_label(label: &str) -> Self {
        match label {
            "NORMAL" => RiskLevel::Normal,
            "SLIGHTLY_ELEVATED" | "LEICHT ERHÖHT" => RiskLevel::SlightlyElevated,
            "CRITICAL" | "KRITISCH" => RiskLevel::Critical,
            other => RiskLevel::Other(other.to_string()),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for RiskLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(label) => Ok(RiskLevel::from_label(&label)),
            other => Ok(RiskLevel::Other(other.to_string())),
        }
    }
}

/// The verdict returned by the analysis service for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabResultResponse {
    /// Parameter the verdict refers to, echoed by the service.
    pub parameter: String,

    /// Plain-language explanation of the value.
    pub explanation: String,

    /// Risk classification. Absent if the service did not send one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,

    /// What the patient should do next.
    pub recommendation: String,

    /// Service-side timestamp (ISO-8601), passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl LabResultResponse {
    /// Returns the risk label for display, or "UNKNOWN" when absent.
    pub fn risk_label(&self) -> &str {
        self.risk_level
            .as_ref()
            .map(|level| level.as_str())
            .unwrap_or("UNKNOWN")
    }
}
