//! End-to-end analysis flows through a session
//!
//! These tests drive submit, retry and history selection against a mock
//! analysis service and check what the session ends up displaying.

use super::{client_for, glucose_request, init_test_env, verdict_body, EXPLAIN_PATH};
use lab_insight::client::{AnalysisClient, AnalysisErrorKind, ClientConfig, CONNECTION_ERROR_MESSAGE};
use lab_insight::history::MemoryStore;
use lab_insight::models::{Gender, RiskLevel};
use lab_insight::session::{AnalysisSession, SubmitError, SubmitRejected};
use serde_json::json;
use std::net::TcpListener;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn new_session() -> AnalysisSession<MemoryStore> {
    init_test_env();
    AnalysisSession::open(MemoryStore::new())
}

/// Endpoint on a local port with nothing listening.
fn unreachable_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}{}", port, EXPLAIN_PATH)
}

#[tokio::test]
async fn test_success_then_select_restores_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(EXPLAIN_PATH))
        .and(body_json(json!({
            "parameter": "Glucose",
            "value": 110.0,
            "unit": "mg/dl",
            "age": 40,
            "gender": "male"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(verdict_body("Glucose", "NORMAL")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut session = new_session();
    session.set_field("value", "110");
    session.set_field("age", "40");

    let verdict = session.submit(&client).await.unwrap();
    assert_eq!(verdict.risk_level, Some(RiskLevel::Normal));
    assert_eq!(session.history().len(), 1);

    let id = session.history().entries()[0].id.clone();
    let submitted = session.last_request().cloned().unwrap();

    // Selecting must not issue a second request; the mock expects exactly one.
    let entry = session.select_history(&id).unwrap();
    assert_eq!(entry.request, submitted);
    assert_eq!(session.result(), Some(&verdict));
    assert!(session.error().is_none());

    assert_eq!(session.trend().len(), 1);
}

#[tokio::test]
async fn test_server_error_then_retry_sends_identical_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(EXPLAIN_PATH))
        .and(body_json(json!({
            "parameter": "LDL",
            "value": 165.0,
            "unit": "mg/dl",
            "age": 58,
            "gender": "female"
        })))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(EXPLAIN_PATH))
        .and(body_json(json!({
            "parameter": "LDL",
            "value": 165.0,
            "unit": "mg/dl",
            "age": 58,
            "gender": "female"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(verdict_body("LDL", "CRITICAL")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut session = new_session();
    session.set_field("parameter", "LDL");
    session.set_field("value", "165");
    session.set_field("age", "58");
    session.set_field("gender", "female");

    let failure = session.submit(&client).await.unwrap_err();
    match failure {
        SubmitError::Analysis(err) => assert_eq!(err.kind, AnalysisErrorKind::Server),
        other => panic!("expected analysis failure, got {:?}", other),
    }
    assert!(session.error_message().unwrap().contains("500"));
    assert!(session.history().is_empty());
    assert!(session.result().is_none());
    assert_eq!(session.current_parameter(), "Glucose");

    let verdict = session.retry(&client).await.unwrap();
    assert_eq!(verdict.risk_level, Some(RiskLevel::Critical));
    assert_eq!(session.current_parameter(), "LDL");
    assert!(session.error().is_none());
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history().entries()[0].request.value, 165.0);
}

#[tokio::test]
async fn test_connection_refused_shows_generic_message() {
    let client = AnalysisClient::new(ClientConfig::new(unreachable_endpoint(), 2000)).unwrap();
    let mut session = new_session();

    let failure = session
        .submit_request(&client, glucose_request(95.0))
        .await
        .unwrap_err();

    assert!(matches!(failure, SubmitError::Analysis(ref e) if e.is_connection()));
    assert_eq!(session.error_message(), Some(CONNECTION_ERROR_MESSAGE));
    assert!(session.history().is_empty());
    assert!(!session.is_loading());
}

#[tokio::test]
async fn test_failure_keeps_previous_result_on_display() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(verdict_body("Glucose", "NORMAL")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut session = new_session();

    session.submit_request(&client, glucose_request(90.0)).await.unwrap();
    let _ = session.submit_request(&client, glucose_request(300.0)).await;

    assert_eq!(
        session.error_message(),
        Some("Server error: 502 Bad Gateway")
    );
    assert_eq!(session.result().unwrap().parameter, "Glucose");
    assert_eq!(session.current_parameter(), "Glucose");
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history().entries()[0].request.value, 90.0);
}

#[tokio::test]
async fn test_fifty_one_submissions_keep_newest_fifty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(verdict_body("Glucose", "NORMAL")))
        .expect(51)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut session = new_session();

    for i in 1..=51 {
        session
            .submit_request(&client, glucose_request(i as f64))
            .await
            .unwrap();
    }

    let entries = session.history().entries();
    assert_eq!(entries.len(), 50);
    assert_eq!(entries[0].request.value, 51.0);
    assert!(entries.iter().all(|e| e.request.value != 1.0));

    let trend = session.trend();
    assert_eq!(trend.len(), 50);
    assert_eq!(trend.first().unwrap().value, 2.0);
    assert_eq!(trend.last().unwrap().value, 51.0);
}

#[tokio::test]
async fn test_invalid_draft_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut session = new_session();
    session.set_field("value", "not a number");
    session.set_field("age", "30");

    let failure = session.submit(&client).await.unwrap_err();
    assert_eq!(failure, SubmitError::Rejected(SubmitRejected::Invalid));
    assert!(session.error().is_none());
}

#[tokio::test]
async fn test_retry_without_previous_request_is_rejected() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let mut session = new_session();

    let failure = session.retry(&client).await.unwrap_err();
    assert_eq!(failure, SubmitError::Rejected(SubmitRejected::NothingToRetry));
}

#[tokio::test]
async fn test_unknown_risk_level_is_displayed_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(verdict_body("CRP", "BORDERLINE")))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut session = new_session();
    let request = lab_insight::models::LabResultRequest::new("CRP", 4.2, 33.0, Gender::Female).unwrap();

    let verdict = session.submit_request(&client, request).await.unwrap();
    assert_eq!(verdict.risk_label(), "BORDERLINE");
    assert_eq!(session.current_parameter(), "CRP");
}
