//! Analysis session state.
//!
//! [`AnalysisSession`] is the one place that owns the user-facing state: the
//! draft being edited, the history, the displayed result, the single error
//! slot, the last submitted request and the loading flag. Front ends drive it
//! with three actions (submit, retry, select a history entry) and render
//! whatever it holds afterwards.
//!
//! A submission is split into [`begin_submission`](AnalysisSession::begin_submission)
//! and [`complete_submission`](AnalysisSession::complete_submission) so that an
//! event-driven front end can show the loading state in between. While a
//! submission is pending the form is read-only and further submissions are
//! rejected, so at most one analysis is in flight.

use crate::client::{AnalysisClient, AnalysisError};
use crate::form::{apply, DraftRequest, FieldChange};
use crate::history::{AnalysisHistoryEntry, HistoryStore, KeyValueStore, TrendPoint};
use crate::models::{LabResultRequest, LabResultResponse};
use log::{debug, info, warn};
use std::fmt;

/// Why a submission was not started. No request is sent in any of these cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    /// Another analysis is still in flight.
    Busy,
    /// The request fails the validity rule.
    Invalid,
    /// Retry was requested before anything was submitted.
    NothingToRetry,
}

impl fmt::Display for SubmitRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitRejected::Busy => write!(f, "An analysis is already in progress"),
            SubmitRejected::Invalid => {
                write!(f, "Value and age must be greater than zero")
            }
            SubmitRejected::NothingToRetry => write!(f, "There is no previous request to retry"),
        }
    }
}

impl std::error::Error for SubmitRejected {}

/// Outcome of a failed submit or retry.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// Nothing was sent.
    Rejected(SubmitRejected),
    /// The request was sent and the analysis failed.
    Analysis(AnalysisError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Rejected(reason) => write!(f, "{}", reason),
            SubmitError::Analysis(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SubmitError::Rejected(reason) => Some(reason),
            SubmitError::Analysis(err) => Some(err),
        }
    }
}

impl From<SubmitRejected> for SubmitError {
    fn from(reason: SubmitRejected) -> Self {
        SubmitError::Rejected(reason)
    }
}

impl From<AnalysisError> for SubmitError {
    fn from(err: AnalysisError) -> Self {
        SubmitError::Analysis(err)
    }
}

/// Owned state of one user session.
#[derive(Debug)]
pub struct AnalysisSession<S: KeyValueStore> {
    draft: DraftRequest,
    history: HistoryStore<S>,
    result: Option<LabResultResponse>,
    error: Option<AnalysisError>,
    last_request: Option<LabResultRequest>,
    current_parameter: String,
    loading: bool,
}

impl<S: KeyValueStore> AnalysisSession<S> {
    /// Creates a session around an already loaded history.
    pub fn new(history: HistoryStore<S>) -> Self {
        let draft = DraftRequest::default();
        let current_parameter = draft.parameter().to_string();
        Self {
            draft,
            history,
            result: None,
            error: None,
            last_request: None,
            current_parameter,
            loading: false,
        }
    }

    /// Loads the history from `storage` and opens a session on it.
    pub fn open(storage: S) -> Self {
        Self::new(HistoryStore::load(storage))
    }

    pub fn draft(&self) -> &DraftRequest {
        &self.draft
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    /// The result currently on display.
    pub fn result(&self) -> Option<&LabResultResponse> {
        self.result.as_ref()
    }

    /// The error currently on display. At most one at a time.
    pub fn error(&self) -> Option<&AnalysisError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }

    /// The request that produced the displayed result or error.
    pub fn last_request(&self) -> Option<&LabResultRequest> {
        self.last_request.as_ref()
    }

    /// Parameter whose trend is charted.
    pub fn current_parameter(&self) -> &str {
        &self.current_parameter
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the submit action should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.loading && self.draft.is_valid()
    }

    /// Applies a form edit. Ignored while an analysis is pending.
    pub fn edit(&mut self, change: FieldChange) {
        if self.loading {
            debug!("Form is read-only while loading; ignoring {:?}", change);
            return;
        }
        self.draft = apply(std::mem::take(&mut self.draft), change);
    }

    /// Applies a textual form edit. Ignored while an analysis is pending.
    pub fn set_field(&mut self, name: &str, raw: &str) {
        if self.loading {
            debug!("Form is read-only while loading; ignoring edit to '{}'", name);
            return;
        }
        self.draft.set_field(name, raw);
    }

    /// Starts a submission: enters the loading state and clears the error.
    ///
    /// The displayed result, and the charted parameter that goes with it,
    /// stay until the new analysis succeeds.
    ///
    /// # Errors
    ///
    /// - `SubmitRejected::Busy` if a submission is already pending
    /// - `SubmitRejected::Invalid` if the request fails the validity rule
    pub fn begin_submission(&mut self, request: LabResultRequest) -> Result<(), SubmitRejected> {
        if self.loading {
            return Err(SubmitRejected::Busy);
        }
        if !request.is_valid() {
            return Err(SubmitRejected::Invalid);
        }

        self.error = None;
        self.last_request = Some(request);
        self.loading = true;
        Ok(())
    }

    /// Finishes the pending submission with the client's outcome.
    ///
    /// On success the analysis is appended to history and displayed. On
    /// failure only the error slot changes. The outcome is handed back to the
    /// caller either way.
    pub fn complete_submission(
        &mut self,
        outcome: Result<LabResultResponse, AnalysisError>,
    ) -> Result<LabResultResponse, AnalysisError> {
        if !self.loading {
            warn!("No submission is pending; outcome not recorded");
            return outcome;
        }
        self.loading = false;

        match outcome {
            Ok(response) => {
                if let Some(request) = self.last_request.clone() {
                    self.current_parameter = request.parameter.clone();
                    if let Err(e) = self.history.append(request, response.clone()) {
                        warn!("Analysis kept in memory but not persisted: {}", e);
                    }
                }
                self.result = Some(response.clone());
                Ok(response)
            }
            Err(err) => {
                info!("Analysis failed: {}", err);
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Submits the current draft.
    pub async fn submit(
        &mut self,
        client: &AnalysisClient,
    ) -> Result<LabResultResponse, SubmitError> {
        let request = self.draft.to_request().ok_or(SubmitRejected::Invalid)?;
        self.submit_request(client, request).await
    }

    /// Submits an explicit request.
    pub async fn submit_request(
        &mut self,
        client: &AnalysisClient,
        request: LabResultRequest,
    ) -> Result<LabResultResponse, SubmitError> {
        self.begin_submission(request.clone())?;
        let outcome = client.explain(&request).await;
        Ok(self.complete_submission(outcome)?)
    }

    /// Re-submits the last request with identical inputs.
    pub async fn retry(&mut self, client: &AnalysisClient) -> Result<LabResultResponse, SubmitError> {
        let request = self
            .last_request
            .clone()
            .ok_or(SubmitRejected::NothingToRetry)?;
        debug!("Retrying analysis for {}", request.parameter);
        self.submit_request(client, request).await
    }

    /// Shows a past analysis without contacting the service.
    ///
    /// History order is left unchanged.
    ///
    /// # Returns
    ///
    /// The selected entry, or `None` if no entry has that id.
    pub fn select_history(&mut self, id: &str) -> Option<&AnalysisHistoryEntry> {
        let entry = self.history.get(id)?;

        self.result = Some(entry.response.clone());
        self.last_request = Some(entry.request.clone());
        self.current_parameter = entry.request.parameter.clone();
        self.error = None;

        Some(entry)
    }

    /// Trend series for the current parameter, oldest first.
    pub fn trend(&self) -> Vec<TrendPoint> {
        self.history.trend(&self.current_parameter)
    }

    /// Closes the session and returns the history.
    pub fn into_history(self) -> HistoryStore<S> {
        self.history
    }
}
