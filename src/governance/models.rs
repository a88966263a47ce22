use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Enforcement decision returned by the governance service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Decision {
    #[serde(rename = "ALLOW")]
    Allow,
    #[serde(rename = "DENY")]
    Deny,
    #[serde(rename = "ASK_INSTRUCTOR")]
    AskInstructor,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Decision::Allow => "ALLOW",
            Decision::Deny => "DENY",
            Decision::AskInstructor => "ASK_INSTRUCTOR",
        };
        f.write_str(s)
    }
}

/// Read-only view of `POST /api/governance/decide` output. Never built
/// client-side except as an error placeholder with confidence 0.
#[derive(Debug, Clone, Deserialize)]
pub struct GovernanceDecision {
    pub decision: Decision,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub policy_id: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub obligations: Vec<String>,
    #[serde(default)]
    pub trace: Vec<String>,
}

/// Form state for the faculty builder. Snapshotted at submission time
/// and sent verbatim; the in-flight copy is never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyDraft {
    pub course_id: String,
    #[serde(rename = "policy_title")]
    pub title: String,
    pub instructor_name: String,
    pub allowed_uses: Vec<String>,
    pub prohibited_practices: Vec<String>,
    pub disclosure_required: bool,
}

/// Success shape of `POST /api/policies/compile`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompileReceipt {
    #[serde(default)]
    pub policy_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_passed: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<serde_json::Value>,
}

/// One anonymized transparency log entry. Metadata only: the service
/// never sends assignment content or real identity, and this client
/// never tries to add either.
#[derive(Debug, Clone, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub decision: String,
    #[serde(default)]
    pub actor_id_pseudonym: String,
}

/// Success shape of `GET /api/transparency/my-logs/{pseudonym}`.
#[derive(Debug, Clone, Deserialize)]
pub struct LogsPayload {
    #[serde(default)]
    pub pseudonym: String,
    #[serde(default)]
    pub total_interactions: u64,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

/// Wire shape of `GET /api/transparency/course-analytics/{course}`.
/// Everything the service might omit is optional; the fallback layer
/// turns this into a complete `AnalyticsView`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsPayload {
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub unique_students: Option<u64>,
    #[serde(default)]
    pub total_events: Option<u64>,
    #[serde(default)]
    pub by_action: Option<BTreeMap<String, u64>>,
    #[serde(default)]
    pub compliance_rate: Option<String>,
}

/// Wire shape of `POST /api/copilot/ask`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CopilotPayload {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub citations: Option<Vec<String>>,
    #[serde(default)]
    pub flag: Option<String>,
}
