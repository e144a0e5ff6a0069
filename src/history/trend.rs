//! Per-parameter trend series for charting.

use super::models::AnalysisHistoryEntry;
use crate::models::RiskLevel;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One point of a parameter's trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: DateTime<Utc>,
    pub value: f64,
    pub unit: String,
    pub risk_level: Option<RiskLevel>,
}

impl From<&AnalysisHistoryEntry> for TrendPoint {
    fn from(entry: &AnalysisHistoryEntry) -> Self {
        Self {
            date: entry.date,
            value: entry.request.value,
            unit: entry.request.unit.clone(),
            risk_level: entry.response.risk_level.clone(),
        }
    }
}

/// Aggregate view of a trend series.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub first: f64,
    pub latest: f64,
}

impl TrendSummary {
    /// Summarizes a chronological series. `None` for an empty series.
    pub fn from_points(points: &[TrendPoint]) -> Option<Self> {
        let first = points.first()?;
        let latest = points.last()?;

        let (min, max) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.value), hi.max(p.value))
            });

        Some(Self {
            count: points.len(),
            min,
            max,
            first: first.value,
            latest: latest.value,
        })
    }

    /// Difference between the latest and the first value.
    pub fn change(&self) -> f64 {
        self.latest - self.first
    }
}

/// Risk level of the most recent point, which decides the chart colour.
///
/// A missing risk level counts as normal.
pub fn latest_risk(points: &[TrendPoint]) -> RiskLevel {
    points
        .last()
        .and_then(|p| p.risk_level.clone())
        .unwrap_or(RiskLevel::Normal)
}
