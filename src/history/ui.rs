//! Text formatting for results, history and trends.
//!
//! This module turns analyses into human-readable strings for the command
//! line: a result card, one-line history rows, and a chronological trend
//! table with a bar per value.

use super::models::AnalysisHistoryEntry;
use super::trend::{latest_risk, TrendPoint, TrendSummary};
use crate::models::{LabResultRequest, LabResultResponse, RiskLevel};
use chrono::{DateTime, Local, Utc};

const RULE: &str = "═══════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────";

/// Width of the longest trend bar, in characters.
const TREND_BAR_WIDTH: usize = 30;

/// Short marker shown next to a risk level.
pub fn risk_marker(risk: Option<&RiskLevel>) -> &'static str {
    match risk {
        Some(RiskLevel::Normal) => "✅",
        Some(RiskLevel::SlightlyElevated) => "⚠️",
        Some(RiskLevel::Critical) => "🚨",
        _ => "ℹ️",
    }
}

/// Formats a list of history entries, one line each, newest first.
///
/// Each line starts with the first 8 characters of the entry id, which is
/// enough to select it again.
pub fn format_history_list(entries: &[AnalysisHistoryEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| format!("{}  {}", short_id(&entry.id), format_history_entry(entry)))
        .collect()
}

/// Formats a single history entry for list display.
///
/// Format: "PARAMETER VALUE UNIT - RISK (timestamp)"
/// Example: "Glucose 110 mg/dl - NORMAL (2026-10-16 14:30:45)"
pub fn format_history_entry(entry: &AnalysisHistoryEntry) -> String {
    format!(
        "{} {} {} - {} ({})",
        entry.request.parameter,
        entry.request.value,
        entry.request.unit,
        entry.response.risk_label(),
        format_timestamp(&entry.date)
    )
}

/// Formats an analysis verdict as a result card.
///
/// The request is optional; when given, the submitted value and patient
/// context are shown above the verdict.
pub fn format_result(request: Option<&LabResultRequest>, response: &LabResultResponse) -> String {
    let mut output = String::new();

    output.push_str(RULE);
    output.push('\n');
    output.push_str(&format!(
        "{} {} - {}\n",
        risk_marker(response.risk_level.as_ref()),
        response.parameter,
        response.risk_label()
    ));
    if let Some(timestamp) = &response.timestamp {
        output.push_str(&format!("Analysed: {}\n", timestamp));
    }
    output.push_str(RULE);
    output.push('\n');

    if let Some(request) = request {
        output.push_str(&format!(
            "Value: {} {}   Age: {}   Gender: {}\n\n",
            request.value, request.unit, request.age, request.gender
        ));
    }

    output.push_str("EXPLANATION\n");
    output.push_str(THIN_RULE);
    output.push('\n');
    output.push_str(response.explanation.trim());
    output.push_str("\n\n");

    output.push_str("RECOMMENDATION\n");
    output.push_str(THIN_RULE);
    output.push('\n');
    output.push_str(response.recommendation.trim());
    output.push('\n');

    output
}

/// Formats a chronological trend series as a table with proportional bars.
pub fn format_trend(parameter: &str, points: &[TrendPoint]) -> String {
    let summary = match TrendSummary::from_points(points) {
        Some(summary) => summary,
        None => return format!("No history for {}.\n", parameter),
    };

    let unit = points.last().map(|p| p.unit.as_str()).unwrap_or_default();
    let mut output = format!(
        "{} {} trend ({} measurement{})\n",
        risk_marker(Some(&latest_risk(points))),
        parameter,
        summary.count,
        if summary.count == 1 { "" } else { "s" }
    );
    output.push_str(THIN_RULE);
    output.push('\n');

    for point in points {
        output.push_str(&format!(
            "{}  {:>8} {:<6} {:<width$}  {}\n",
            format_timestamp(&point.date),
            point.value,
            point.unit,
            "█".repeat(bar_length(point.value, summary.max)),
            point
                .risk_level
                .as_ref()
                .map(|r| r.as_str())
                .unwrap_or("UNKNOWN"),
            width = TREND_BAR_WIDTH
        ));
    }

    output.push_str(THIN_RULE);
    output.push('\n');
    output.push_str(&format!(
        "min {} / max {} / latest {} {} (change {:+})\n",
        summary.min,
        summary.max,
        summary.latest,
        unit,
        summary.change()
    ));

    output
}

fn bar_length(value: f64, max: f64) -> usize {
    if max <= 0.0 || value <= 0.0 {
        return 0;
    }
    ((value / max) * TREND_BAR_WIDTH as f64).round().max(1.0) as usize
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Formats a timestamp in local time for display.
///
/// Format: "YYYY-MM-DD HH:MM:SS"
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    let local_time: DateTime<Local> = timestamp.with_timezone(&Local);
    local_time.format("%Y-%m-%d %H:%M:%S").to_string()
}
