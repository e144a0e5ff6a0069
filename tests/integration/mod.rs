//! Integration tests module for Lab Insight
//!
//! Shared helpers for driving a full session against a mock analysis
//! service.

pub mod analysis_flow_test;
pub mod history_persistence_test;

use lab_insight::client::{AnalysisClient, ClientConfig};
use lab_insight::models::{Gender, LabResultRequest};
use serde_json::{json, Value};
use std::sync::Once;
use wiremock::MockServer;

static INIT: Once = Once::new();

pub const EXPLAIN_PATH: &str = "/api/v1/lab-results/explain";

/// Initialize test environment (run once)
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Client posting to the mock server's explain endpoint.
pub fn client_for(server: &MockServer) -> AnalysisClient {
    let endpoint = format!("{}{}", server.uri(), EXPLAIN_PATH);
    AnalysisClient::new(ClientConfig::new(endpoint, 5000)).expect("client builds")
}

pub fn glucose_request(value: f64) -> LabResultRequest {
    LabResultRequest::new("Glucose", value, 40.0, Gender::Male).expect("known parameter")
}

/// Response body the service returns for a verdict.
pub fn verdict_body(parameter: &str, risk_level: &str) -> Value {
    json!({
        "parameter": parameter,
        "explanation": format!("{} is within the expected range.", parameter),
        "riskLevel": risk_level,
        "recommendation": "No action needed.",
        "timestamp": "2026-10-16T09:00:00Z"
    })
}
