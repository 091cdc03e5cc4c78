//! Owned message types for the network worker.
//!
//! Requests flow main loop → worker over one channel; settlements flow back
//! as `AppEvent::Api(Box<ApiResponse>)` on the unified event bus. All types
//! are fully owned (`Send`) so nothing borrows across the task boundary.
//!
//! Analyze traffic carries the session's sequence tag through the round
//! trip; the session discards settlements that arrive out of order.

use std::path::PathBuf;

use revu_core::types::{AnalysisResult, DashboardSummary, RuleSet};

/// Requests sent from the main loop to the network worker.
#[derive(Debug)]
pub enum ApiRequest {
    /// Analyze the serialized buffer under the tracked filename.
    AnalyzeText {
        /// Sequence tag from `ReviewSession::begin_analyze_text`.
        seq: u64,
        /// Canonical buffer serialization.
        code: String,
        /// Filename accompanying the payload.
        filename: String,
    },
    /// Read a local file and submit it as a multipart upload.
    AnalyzeUpload {
        /// Sequence tag from `ReviewSession::begin_analyze_file`.
        seq: u64,
        /// Path the user entered; read by the worker, not the main loop.
        path: PathBuf,
    },
    /// Fetch the aggregate dashboard counters. Best-effort: a failure is
    /// logged by the worker and produces no settlement at all.
    FetchDashboard,
    /// Fetch the authoritative rule mapping. Same best-effort policy: the
    /// rules panel simply stays in its loading state on failure.
    FetchRules,
    /// Push the full working rule set.
    SaveRules(RuleSet),
}

/// Settlements sent from the network worker back to the main loop.
#[derive(Debug)]
pub enum ApiResponse {
    /// A text analysis succeeded.
    AnalyzeOk {
        seq: u64,
        result: AnalysisResult,
    },
    /// An upload analysis succeeded. Carries everything the session applies
    /// atomically: the result, the uploaded file's name, and its content.
    UploadOk {
        seq: u64,
        result: AnalysisResult,
        filename: String,
        contents: String,
    },
    /// An analyze or upload attempt failed. `message` is the generic
    /// user-facing text; the underlying error was already logged.
    AnalyzeFailed {
        seq: u64,
        message: String,
    },
    /// A dashboard snapshot arrived.
    Dashboard(DashboardSummary),
    /// The initial rule mapping arrived.
    Rules(RuleSet),
    /// The in-flight rules save was acknowledged.
    RulesSaved,
    /// The in-flight rules save failed; working edits stay as they are.
    RulesSaveFailed,
}
