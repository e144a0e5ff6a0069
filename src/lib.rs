//! Lab Insight
//!
//! A client for a remote lab-result analysis service. The user enters one
//! measurement (parameter, value, age, gender), the service returns an
//! explanation, a risk level and a recommendation, and every successful
//! analysis is kept in a persistent history that can be charted per
//! parameter over time.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - **models**: Parameter catalog and the request/response wire types
//! - **form**: The draft request and its pure edit reducer
//! - **client**: Posts a request to the analysis endpoint
//! - **history**: Capped, persisted history and per-parameter trends
//! - **session**: Owns the user-facing state and the submit, retry and
//!   select-history actions
//! - **config**: Settings loading and the global configuration
//!
//! # Submission Flow
//!
//! 1. The draft is edited until value and age are both positive
//! 2. The session enters the loading state and clears any error
//! 3. The client posts the request as JSON and waits for the verdict
//! 4. On success the verdict is shown and prepended to history, which is
//!    saved immediately
//! 5. On failure one error message is shown and nothing else changes
//!
//! # Usage
//!
//! ```no_run
//! use lab_insight::client::AnalysisClient;
//! use lab_insight::history::FileStore;
//! use lab_insight::session::AnalysisSession;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AnalysisClient::from_global_config()?;
//! let mut session = AnalysisSession::open(FileStore::in_default_dir()?);
//!
//! session.set_field("parameter", "LDL");
//! session.set_field("value", "160");
//! session.set_field("age", "52");
//!
//! let verdict = session.submit(&client).await?;
//! println!("{}: {}", verdict.parameter, verdict.risk_label());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod form;
pub mod history;
pub mod models;
pub mod session;

pub use client::{AnalysisClient, AnalysisError};
pub use session::{AnalysisSession, SubmitError, SubmitRejected};
