//! The bounded, persisted analysis history.
//!
//! Entries are kept newest-first and capped at a fixed number (50 by default).
//! Every mutation rewrites the whole collection under [`HISTORY_KEY`] in a
//! single write, so reloading always restores the last committed state.

use super::models::{AnalysisHistoryEntry, HistoryError};
use super::storage::KeyValueStore;
use super::trend::TrendPoint;
use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::models::{LabResultRequest, LabResultResponse};
use log::{debug, warn};

/// Storage key the history is persisted under.
pub const HISTORY_KEY: &str = "lab_ai_history";

/// Ordered log of past analyses backed by a [`KeyValueStore`].
#[derive(Debug)]
pub struct HistoryStore<S: KeyValueStore> {
    storage: S,
    entries: Vec<AnalysisHistoryEntry>,
    limit: usize,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Loads the history with the default limit of 50 entries.
    ///
    /// Never fails: missing data yields an empty history, and unreadable or
    /// corrupt data is logged and replaced by an empty history.
    pub fn load(storage: S) -> Self {
        Self::load_with_limit(storage, DEFAULT_HISTORY_LIMIT)
    }

    /// Loads the history keeping at most `limit` entries.
    ///
    /// A limit of zero is treated as one.
    pub fn load_with_limit(storage: S, limit: usize) -> Self {
        let limit = limit.max(1);

        let mut entries = match read_entries(&storage) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Discarding unreadable analysis history: {}", e);
                Vec::new()
            }
        };

        // A lowered limit takes effect in memory now and on disk at the next write
        entries.truncate(limit);
        debug!("Loaded {} history entries", entries.len());

        Self {
            storage,
            entries,
            limit,
        }
    }

    /// Records a successful analysis.
    ///
    /// Creates an entry with a fresh id and the current time, puts it first,
    /// drops the oldest entries beyond the limit and persists the result.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError` if persisting fails. The in-memory history is
    /// updated regardless, so the session keeps working.
    pub fn append(
        &mut self,
        request: LabResultRequest,
        response: LabResultResponse,
    ) -> Result<(), HistoryError> {
        self.record(AnalysisHistoryEntry::new(request, response))
    }

    /// Records a pre-built entry, with the same ordering and cap as [`append`](Self::append).
    fn record(&mut self, entry: AnalysisHistoryEntry) -> Result<(), HistoryError> {
        debug!("Recording history entry {} ({})", entry.id, entry.parameter());
        self.entries.insert(0, entry);
        self.entries.truncate(self.limit);
        self.save()
    }

    /// Writes the full collection to storage in one write.
    fn save(&mut self) -> Result<(), HistoryError> {
        let json = serde_json::to_string(&self.entries)?;
        self.storage.set(HISTORY_KEY, &json)
    }

    /// All entries, newest first.
    pub fn entries(&self) -> &[AnalysisHistoryEntry] {
        &self.entries
    }

    /// The most recently recorded entry.
    pub fn latest(&self) -> Option<&AnalysisHistoryEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Finds an entry by id.
    pub fn get(&self, id: &str) -> Option<&AnalysisHistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Returns the request and response of an entry for redisplay.
    ///
    /// Selecting does not change the order of the history.
    pub fn select(&self, id: &str) -> Option<(&LabResultRequest, &LabResultResponse)> {
        self.get(id).map(|entry| (&entry.request, &entry.response))
    }

    /// Entries for one parameter, oldest first.
    ///
    /// Storage order is newest-first for display; charts read chronologically,
    /// so the order is reversed and then sorted by receipt time. The sort is
    /// stable, which keeps insertion order for identical timestamps.
    pub fn filter_by_parameter(&self, parameter: &str) -> Vec<&AnalysisHistoryEntry> {
        let mut matching: Vec<&AnalysisHistoryEntry> = self
            .entries
            .iter()
            .rev()
            .filter(|entry| entry.request.parameter == parameter)
            .collect();
        matching.sort_by_key(|entry| entry.date);
        matching
    }

    /// Chart series for one parameter, oldest first.
    pub fn trend(&self, parameter: &str) -> Vec<TrendPoint> {
        self.filter_by_parameter(parameter)
            .into_iter()
            .map(TrendPoint::from)
            .collect()
    }

    /// Distinct parameters present in the history, most recent first.
    pub fn parameters(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.parameter()) {
                seen.push(entry.parameter());
            }
        }
        seen
    }

    /// Gives back the underlying storage.
    pub fn into_storage(self) -> S {
        self.storage
    }
}

fn read_entries<S: KeyValueStore>(storage: &S) -> Result<Vec<AnalysisHistoryEntry>, HistoryError> {
    match storage.get(HISTORY_KEY)? {
        Some(json) if !json.trim().is_empty() => Ok(serde_json::from_str(&json)?),
        _ => Ok(Vec::new()),
    }
}
