//! Wire data model for the review service.
//!
//! Field names follow the service's JSON contract (camelCase), mapped via
//! serde. All types are fully owned so they can be transferred from the
//! network worker task to the main loop and stored in session state without
//! lifetime plumbing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Issue category reported by the analysis engine.
///
/// Drives both the summary counters and the per-line render class: `Error`
/// and `Security` have dedicated line classes, everything else renders as a
/// warning (see `diagnostics`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IssueCategory {
    Error,
    Warning,
    Optimization,
    Security,
}

/// Issue severity reported by the analysis engine.
///
/// Purely presentational on the client: rendered as a colored badge next to
/// each issue. Never influences line classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// One finding from the analysis engine, optionally tied to a source line.
///
/// `line_number` is 1-based. It is `None` for file-level issues; the service
/// also emits `0` for rules that cannot name a line, which matches no 1-based
/// editor line and therefore never classifies one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub line_number: Option<u32>,
    pub category: IssueCategory,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub suggestion: String,
}

/// The outcome of one analysis call, replaced wholesale on every success.
///
/// The count fields are pre-aggregated by the service and trusted as-is for
/// the summary display; per-line classes are derived independently from
/// `issues` (the counts and the issue list are never cross-checked).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub review_id: i64,
    pub filename: String,
    pub issues: Vec<Issue>,
    pub error_count: u32,
    pub warning_count: u32,
    pub optimization_count: u32,
    pub security_count: u32,
}

/// Aggregate counters across all historical reviews, server-computed.
///
/// A read-only snapshot: each refresh replaces the previous one wholesale,
/// never merges.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_reviews: u64,
    pub total_issues: u64,
    pub total_errors: u64,
    pub total_warnings: u64,
    pub total_optimizations: u64,
    pub total_security_issues: u64,
}

/// Flat rule-name → enabled mapping, exactly as the service serves it.
///
/// `BTreeMap` so the rules panel lists rules in a stable order regardless of
/// the JSON object's key order.
pub type RuleSet = BTreeMap<String, bool>;
