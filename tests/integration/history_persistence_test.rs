//! History persistence across sessions
//!
//! These tests use a real data directory to check that analyses survive a
//! restart and that damaged history files never stop a session from opening.

use super::{client_for, glucose_request, init_test_env, verdict_body};
use lab_insight::history::{FileStore, HistoryStore, KeyValueStore, HISTORY_KEY};
use lab_insight::session::AnalysisSession;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_history_survives_restart() {
    init_test_env();
    let temp_dir = TempDir::new().unwrap();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(verdict_body("Glucose", "NORMAL")))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let ids: Vec<String> = {
        let mut session = AnalysisSession::open(FileStore::new(temp_dir.path()));
        for value in [92.0, 104.0, 131.0] {
            session
                .submit_request(&client, glucose_request(value))
                .await
                .unwrap();
        }
        session.history().entries().iter().map(|e| e.id.clone()).collect()
    };

    assert!(temp_dir.path().join("lab_ai_history.json").exists());

    let mut reopened = AnalysisSession::open(FileStore::new(temp_dir.path()));
    let reloaded: Vec<String> = reopened
        .history()
        .entries()
        .iter()
        .map(|e| e.id.clone())
        .collect();
    assert_eq!(reloaded, ids);

    let oldest = ids.last().unwrap().clone();
    let entry = reopened.select_history(&oldest).unwrap();
    assert_eq!(entry.request.value, 92.0);

    let values: Vec<f64> = reopened.trend().iter().map(|p| p.value).collect();
    assert_eq!(values, vec![92.0, 104.0, 131.0]);
}

#[test]
fn test_corrupt_history_file_opens_empty() {
    init_test_env();
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("lab_ai_history.json"),
        "{ this is not json",
    )
    .unwrap();

    let session = AnalysisSession::open(FileStore::new(temp_dir.path()));
    assert!(session.history().is_empty());
    assert!(session.result().is_none());
}

#[test]
fn test_wrong_shape_history_opens_empty() {
    init_test_env();
    let temp_dir = TempDir::new().unwrap();
    let mut storage = FileStore::new(temp_dir.path());
    storage
        .set(HISTORY_KEY, r#"{"entries": "not an array"}"#)
        .unwrap();

    let store = HistoryStore::load(storage);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_corrupt_file_is_replaced_on_next_success() {
    init_test_env();
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("lab_ai_history.json"), "[[[").unwrap();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(verdict_body("Glucose", "NORMAL")))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let mut session = AnalysisSession::open(FileStore::new(temp_dir.path()));
    session
        .submit_request(&client, glucose_request(99.0))
        .await
        .unwrap();

    let reloaded = HistoryStore::load(FileStore::new(temp_dir.path()));
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.entries()[0].request.value, 99.0);
}

#[test]
fn test_lowered_limit_truncates_on_load() {
    init_test_env();
    let temp_dir = TempDir::new().unwrap();

    let mut store = HistoryStore::load(FileStore::new(temp_dir.path()));
    for i in 1..=10 {
        let request = glucose_request(i as f64);
        let response = serde_json::from_value(verdict_body("Glucose", "NORMAL")).unwrap();
        store.append(request, response).unwrap();
    }

    let limited = HistoryStore::load_with_limit(FileStore::new(temp_dir.path()), 3);
    let values: Vec<f64> = limited.entries().iter().map(|e| e.request.value).collect();
    assert_eq!(values, vec![10.0, 9.0, 8.0]);
}
