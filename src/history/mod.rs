//! Analysis history tracking and persistence.
//!
//! This module keeps the record of past analyses so results can be reviewed
//! without asking the service again and so each parameter can be charted
//! over time.
//!
//! # Features
//!
//! - Newest-first history capped at 50 entries
//! - Whole-collection persistence after every append
//! - Fail-soft loading: corrupt data yields an empty history
//! - Chronological per-parameter series for charting
//!
//! # Example
//!
//! ```
//! use lab_insight::history::{HistoryStore, MemoryStore};
//! use lab_insight::models::{Gender, LabResultRequest, LabResultResponse, RiskLevel};
//!
//! let mut store = HistoryStore::load(MemoryStore::new());
//!
//! let request = LabResultRequest::new("Glucose", 110.0, 40.0, Gender::Male).unwrap();
//! let response = LabResultResponse {
//!     parameter: "Glucose".to_string(),
//!     explanation: "Slightly above the fasting range.".to_string(),
//!     risk_level: Some(RiskLevel::SlightlyElevated),
//!     recommendation: "Repeat in three months.".to_string(),
//!     timestamp: None,
//! };
//!
//! store.append(request, response).unwrap();
//! assert_eq!(store.trend("Glucose").len(), 1);
//! ```

pub mod models;
pub mod storage;
pub mod store;
pub mod trend;
pub mod ui;

// Re-export commonly used types
pub use models::{AnalysisHistoryEntry, HistoryError};
pub use storage::{default_data_dir, FileStore, KeyValueStore, MemoryStore};
pub use store::{HistoryStore, HISTORY_KEY};
pub use trend::{latest_risk, TrendPoint, TrendSummary};
pub use ui::{format_history_entry, format_history_list, format_result, format_trend};
