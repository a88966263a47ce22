//! Deterministic placeholder synthesis. Every function here is pure
//! and total: absent or partial service data maps to a complete,
//! labeled record so no screen ever renders empty. Placeholders carry
//! only aggregate counts, enum decisions, and non-identifying labels.

use crate::governance::metrics;
use crate::governance::models::{AnalyticsPayload, CopilotPayload, LogEntry};

/// Reference action distribution shown when `by_action` is absent.
pub const REFERENCE_DISTRIBUTION: [(&str, u64); 4] = [
    ("brainstorm", 18),
    ("code_review", 12),
    ("citation_check", 9),
    ("full_solution", 3),
];

pub const DEFAULT_ANSWER: &str = "\u{2705} YES \u{2014} Brainstorming is explicitly permitted for assignments.";
pub const DEFAULT_CITATION: &str =
    "CS101 Policy \u{00a7}2.1 \u{2014} Brainstorming allowed with disclosure.";
pub const DISCLOSURE_TEMPLATE: &str =
    "I used AI for brainstorming ideas; final submission is my own work.";

const DEFAULT_UNIQUE_STUDENTS: u64 = 42;
const DEFAULT_TOTAL_EVENTS: u64 = 64;
const DEFAULT_CONFIDENCE_PCT: u8 = 98;

/// Complete analytics record for the admin screen.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsView {
    pub course_id: String,
    pub period: String,
    /// Card values, defaulted when the service omits them.
    pub unique_students: u64,
    pub total_events: u64,
    /// Ordered action rows, real or reference distribution.
    pub rows: Vec<(String, u64)>,
    /// Denominator for bar math: reported total when present, else the
    /// recomputed sum of the rows. Kept separate from the card value.
    pub chart_total: u64,
    pub compliance_rate: String,
}

/// Complete copilot record for the student screen.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerView {
    pub answer: String,
    pub confidence_pct: u8,
    pub citations: Vec<String>,
    pub flag: Option<String>,
}

/// One rendered timeline row (dashboard).
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub title: String,
    pub subtitle: String,
}

/// Home screen live counters; literal defaults until a first real
/// analytics measurement arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomeCounters {
    pub allowed: u64,
    pub restricted: u64,
    pub compliance_pct: u64,
}

pub fn home_counters() -> HomeCounters {
    HomeCounters {
        allowed: 12,
        restricted: 5,
        compliance_pct: 98,
    }
}

/// Map a partial (or absent) analytics payload to a complete view.
/// Present fields always win over placeholders.
pub fn analytics(course_id: &str, raw: Option<&AnalyticsPayload>) -> AnalyticsView {
    let raw_default = AnalyticsPayload::default();
    let raw = raw.unwrap_or(&raw_default);

    let rows: Vec<(String, u64)> = match &raw.by_action {
        Some(by_action) if !by_action.is_empty() => by_action
            .iter()
            .map(|(action, count)| (action.clone(), *count))
            .collect(),
        _ => REFERENCE_DISTRIBUTION
            .iter()
            .map(|(action, count)| (action.to_string(), *count))
            .collect(),
    };

    // Recompute defensively: the reported total need not equal the sum
    // of by_action, and may be missing entirely.
    let real_sum: u64 = raw
        .by_action
        .as_ref()
        .map(|by_action| by_action.values().sum())
        .unwrap_or(0);
    let chart_total = raw.total_events.unwrap_or(real_sum);

    let full_solution = raw
        .by_action
        .as_ref()
        .and_then(|by_action| by_action.get("full_solution").copied())
        .unwrap_or(0);
    let compliance_rate = raw
        .compliance_rate
        .clone()
        .unwrap_or_else(|| metrics::compliance_rate(chart_total, full_solution));

    AnalyticsView {
        course_id: raw
            .course_id
            .clone()
            .unwrap_or_else(|| course_id.to_string()),
        period: raw.period.clone().unwrap_or_else(|| "last_7_days".to_string()),
        unique_students: raw.unique_students.unwrap_or(DEFAULT_UNIQUE_STUDENTS),
        total_events: raw.total_events.unwrap_or(DEFAULT_TOTAL_EVENTS),
        rows,
        chart_total,
        compliance_rate,
    }
}

/// Map a partial (or absent) copilot payload to a complete answer.
pub fn copilot_answer(raw: Option<&CopilotPayload>) -> AnswerView {
    let raw_default = CopilotPayload::default();
    let raw = raw.unwrap_or(&raw_default);

    let confidence_pct = match raw.confidence {
        Some(c) => (c * 100.0).round().clamp(0.0, 100.0) as u8,
        None => DEFAULT_CONFIDENCE_PCT,
    };
    let citations = match &raw.citations {
        Some(citations) if !citations.is_empty() => citations.clone(),
        _ => vec![DEFAULT_CITATION.to_string()],
    };

    AnswerView {
        answer: raw
            .answer
            .clone()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ANSWER.to_string()),
        confidence_pct,
        citations,
        flag: raw.flag.clone(),
    }
}

/// Error placeholder answer: confidence 0, no citations fabricated.
pub fn copilot_error(message: &str) -> AnswerView {
    AnswerView {
        answer: format!("\u{274c} Error: {message}"),
        confidence_pct: 0,
        citations: Vec::new(),
        flag: None,
    }
}

/// Timeline rows from real logs, or the literal three-entry history
/// when none are available.
pub fn timeline(logs: &[LogEntry]) -> Vec<TimelineEntry> {
    if logs.is_empty() {
        return vec![
            TimelineEntry {
                title: "Jan 29: Brainstorm".to_string(),
                subtitle: "CS101 \u{2014} ALLOW".to_string(),
            },
            TimelineEntry {
                title: "Jan 28: Code Review".to_string(),
                subtitle: "CS101 \u{2014} ALLOW".to_string(),
            },
            TimelineEntry {
                title: "Jan 26: Full Solution".to_string(),
                subtitle: "CS101 \u{2014} DENY".to_string(),
            },
        ];
    }

    logs.iter()
        .map(|log| TimelineEntry {
            title: format!("{}: {}", short_date(&log.timestamp), log.action),
            subtitle: format!("{} \u{2014} {}", log.course_id, log.decision),
        })
        .collect()
}

/// Per-action aggregate counts for the transparency breakdown.
pub fn aggregates(logs: &[LogEntry]) -> Vec<(String, u64)> {
    if logs.is_empty() {
        return REFERENCE_DISTRIBUTION
            .iter()
            .map(|(action, count)| (action.to_string(), *count))
            .collect();
    }
    let mut counts: Vec<(String, u64)> = Vec::new();
    for log in logs {
        match counts.iter_mut().find(|(action, _)| *action == log.action) {
            Some((_, count)) => *count += 1,
            None => counts.push((log.action.clone(), 1)),
        }
    }
    counts
}

/// "2026-01-29T10:00:00Z" -> "2026-01-29"; anything shorter passes
/// through unchanged.
fn short_date(timestamp: &str) -> &str {
    match timestamp.split_once('T') {
        Some((date, _)) => date,
        None => timestamp,
    }
}
