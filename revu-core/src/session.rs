//! The review-session controller.
//!
//! Owns every piece of mutable review state (the source buffer, the current
//! analysis result and its diagnostic index, the dashboard snapshot, and the
//! analyze status) and is the only mutator of any of them. The presentation
//! layer reads immutable snapshots between renders; network settlement flows
//! back in through the `settle_*` methods.
//!
//! Submissions are tagged with a monotonically increasing sequence number and
//! settlements are discarded unless strictly newer than the last settled one,
//! so a delayed response can never overwrite state that a later request has
//! already produced.

use crate::buffer::SourceBuffer;
use crate::diagnostics::{DiagnosticIndex, LineClass};
use crate::types::{AnalysisResult, DashboardSummary};

/// Initial document shown before any code has been entered or loaded.
pub const PLACEHOLDER_CODE: &str = "// Paste your Java code here\n";

/// Default filename used for pasted (non-uploaded) code.
pub const DEFAULT_FILENAME: &str = "MyClass.java";

/// Status of the analyze pipeline. Orthogonal to the rules save axis.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnalyzeStatus {
    /// No analysis in flight; submissions are accepted.
    #[default]
    Idle,
    /// A request is in flight; further submissions are rejected until it settles.
    Analyzing,
    /// The last submission failed. Cleared by the next submission.
    Error(String),
}

/// A granted analyze-text submission: the sequence tag plus the exact payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeTicket {
    /// Sequence number this submission settles under.
    pub seq: u64,
    /// Canonical buffer serialization at submission time.
    pub code: String,
    /// Filename accompanying the payload.
    pub filename: String,
}

/// In-memory state machine for one review session.
#[derive(Debug, Clone, Default)]
pub struct ReviewSession {
    buffer: SourceBuffer,
    filename: String,
    analysis: Option<AnalysisResult>,
    index: DiagnosticIndex,
    dashboard: Option<DashboardSummary>,
    status: AnalyzeStatus,
    issued_seq: u64,
    settled_seq: u64,
}

impl ReviewSession {
    /// Creates a session with the placeholder document and default filename.
    pub fn new() -> Self {
        Self {
            buffer: SourceBuffer::from_text(PLACEHOLDER_CODE),
            filename: DEFAULT_FILENAME.to_owned(),
            ..Self::default()
        }
    }

    // --- snapshots ---------------------------------------------------------

    /// The editable source buffer.
    pub fn buffer(&self) -> &SourceBuffer {
        &self.buffer
    }

    /// Filename that will accompany the next analyze-text submission.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The current analysis result, if any analysis has succeeded yet.
    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    /// The latest dashboard snapshot, if one has arrived.
    pub fn dashboard(&self) -> Option<&DashboardSummary> {
        self.dashboard.as_ref()
    }

    /// Current analyze status.
    pub fn status(&self) -> &AnalyzeStatus {
        &self.status
    }

    /// True while an analyze request is in flight.
    pub fn is_analyzing(&self) -> bool {
        self.status == AnalyzeStatus::Analyzing
    }

    /// Render class for a 1-based editor line, from the current result.
    pub fn classify_line(&self, line_number: u32) -> LineClass {
        self.index.classify(line_number)
    }

    // --- local mutation ----------------------------------------------------

    /// Replaces one buffer line (0-based). Out-of-bounds edits are no-ops.
    ///
    /// Editing never re-triggers analysis; the result on screen describes the
    /// source as it was when the analysis ran.
    pub fn set_line(&mut self, index: usize, text: &str) {
        self.buffer.set_line(index, text);
    }

    /// Updates the filename accompanying future analyze-text submissions.
    pub fn set_filename(&mut self, filename: &str) {
        self.filename = filename.to_owned();
    }

    // --- analyze pipeline --------------------------------------------------

    /// Submits the buffer for analysis.
    ///
    /// Returns `None` without touching the network when a request is already
    /// in flight, or when the trimmed serialization is empty; the latter
    /// sets the error status locally. A granted ticket moves the session to
    /// `Analyzing` and clears any previous error.
    pub fn begin_analyze_text(&mut self) -> Option<AnalyzeTicket> {
        if self.is_analyzing() {
            return None;
        }
        let code = self.buffer.serialize();
        if code.trim().is_empty() {
            self.status = AnalyzeStatus::Error("Please enter some code.".to_owned());
            return None;
        }
        self.issued_seq += 1;
        self.status = AnalyzeStatus::Analyzing;
        Some(AnalyzeTicket {
            seq: self.issued_seq,
            code,
            filename: self.filename.clone(),
        })
    }

    /// Submits a file for upload analysis.
    ///
    /// No pre-validation: the file's existence and content are the worker's
    /// concern. Returns the sequence tag, or `None` while a request is in
    /// flight.
    pub fn begin_analyze_file(&mut self) -> Option<u64> {
        if self.is_analyzing() {
            return None;
        }
        self.issued_seq += 1;
        self.status = AnalyzeStatus::Analyzing;
        Some(self.issued_seq)
    }

    /// Settles a text analysis successfully.
    ///
    /// Replaces the analysis result wholesale, rebuilds the diagnostic index,
    /// and returns to `Idle`. Returns `false` (state untouched) when the
    /// settlement is stale. The caller triggers the dashboard refresh *after*
    /// a `true` return, so the buffer/result update is ordered before it.
    pub fn settle_analyze_ok(&mut self, seq: u64, result: AnalysisResult) -> bool {
        if seq <= self.settled_seq {
            return false;
        }
        self.settled_seq = seq;
        self.index = DiagnosticIndex::build(&result.issues);
        self.analysis = Some(result);
        self.status = AnalyzeStatus::Idle;
        true
    }

    /// Settles an upload analysis successfully.
    ///
    /// This is the one path where the buffer and the result change together:
    /// the uploaded content replaces the document, the tracked filename is
    /// updated, and the result is applied, all under one settlement.
    pub fn settle_upload_ok(
        &mut self,
        seq: u64,
        result: AnalysisResult,
        filename: &str,
        contents: &str,
    ) -> bool {
        if seq <= self.settled_seq {
            return false;
        }
        self.settled_seq = seq;
        self.buffer.replace_all(contents);
        self.filename = filename.to_owned();
        self.index = DiagnosticIndex::build(&result.issues);
        self.analysis = Some(result);
        self.status = AnalyzeStatus::Idle;
        true
    }

    /// Settles an analysis with a failure message.
    ///
    /// The previous result (if any) stays on screen. Stale failures are
    /// discarded just like stale successes.
    pub fn settle_analyze_err(&mut self, seq: u64, message: &str) -> bool {
        if seq <= self.settled_seq {
            return false;
        }
        self.settled_seq = seq;
        self.status = AnalyzeStatus::Error(message.to_owned());
        true
    }

    // --- dashboard ---------------------------------------------------------

    /// Replaces the dashboard snapshot wholesale.
    ///
    /// Dashboard refreshes are best-effort and last-response-wins by arrival
    /// order; a failed refresh simply never calls this.
    pub fn apply_dashboard(&mut self, summary: DashboardSummary) {
        self.dashboard = Some(summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Issue, IssueCategory, Severity};

    fn result(review_id: i64, issues: Vec<Issue>) -> AnalysisResult {
        AnalysisResult {
            review_id,
            filename: "MyClass.java".to_owned(),
            issues,
            error_count: 0,
            warning_count: 0,
            optimization_count: 0,
            security_count: 0,
        }
    }

    fn issue(line: u32, category: IssueCategory) -> Issue {
        Issue {
            id: None,
            line_number: Some(line),
            category,
            severity: Severity::High,
            title: String::new(),
            description: String::new(),
            suggestion: String::new(),
        }
    }

    #[test]
    fn empty_buffer_is_rejected_locally() {
        let mut session = ReviewSession::new();
        session.set_line(0, "   ");
        session.set_line(1, "");
        assert_eq!(session.begin_analyze_text(), None);
        assert!(matches!(session.status(), AnalyzeStatus::Error(_)));
    }

    #[test]
    fn submission_while_analyzing_is_rejected() {
        let mut session = ReviewSession::new();
        let ticket = session.begin_analyze_text().unwrap();
        assert_eq!(session.begin_analyze_text(), None);
        assert_eq!(session.begin_analyze_file(), None);
        assert!(session.settle_analyze_ok(ticket.seq, result(1, Vec::new())));
        assert!(session.begin_analyze_text().is_some());
    }

    #[test]
    fn a_new_submission_clears_the_previous_error() {
        let mut session = ReviewSession::new();
        let ticket = session.begin_analyze_text().unwrap();
        session.settle_analyze_err(ticket.seq, "Something went wrong while analyzing.");
        assert!(matches!(session.status(), AnalyzeStatus::Error(_)));

        session.begin_analyze_text().unwrap();
        assert_eq!(*session.status(), AnalyzeStatus::Analyzing);
    }

    #[test]
    fn success_rebuilds_the_diagnostic_index() {
        let mut session = ReviewSession::new();
        let ticket = session.begin_analyze_text().unwrap();
        session.settle_analyze_ok(
            ticket.seq,
            result(
                1,
                vec![
                    issue(3, IssueCategory::Error),
                    issue(3, IssueCategory::Security),
                ],
            ),
        );
        assert_eq!(session.classify_line(3), crate::diagnostics::LineClass::Error);
        assert_eq!(session.classify_line(1), crate::diagnostics::LineClass::None);
    }

    #[test]
    fn stale_settlement_is_discarded() {
        let mut session = ReviewSession::new();
        let first = session.begin_analyze_text().unwrap();
        // The transport reports first as failed (e.g. a timeout)...
        assert!(session.settle_analyze_err(first.seq, "timed out"));
        // ...a second submission settles successfully...
        let second = session.begin_analyze_text().unwrap();
        assert!(session.settle_analyze_ok(second.seq, result(2, Vec::new())));
        // ...and then the first request's real response straggles in.
        assert!(!session.settle_analyze_ok(first.seq, result(1, Vec::new())));
        assert_eq!(session.analysis().unwrap().review_id, 2);
        assert_eq!(*session.status(), AnalyzeStatus::Idle);
    }

    #[test]
    fn upload_applies_buffer_and_result_together() {
        let mut session = ReviewSession::new();
        let seq = session.begin_analyze_file().unwrap();
        session.settle_upload_ok(seq, result(9, Vec::new()), "Other.java", "class Other {}\n");
        assert_eq!(session.filename(), "Other.java");
        assert_eq!(session.buffer().serialize(), "class Other {}\n");
        assert_eq!(session.analysis().unwrap().review_id, 9);
    }

    #[test]
    fn text_analysis_does_not_touch_the_filename() {
        let mut session = ReviewSession::new();
        session.set_filename("Mine.java");
        let ticket = session.begin_analyze_text().unwrap();
        let mut r = result(1, Vec::new());
        r.filename = "Mine.java".to_owned();
        session.settle_analyze_ok(ticket.seq, r);
        assert_eq!(session.filename(), "Mine.java");
    }

    #[test]
    fn dashboard_snapshot_is_replaced_wholesale() {
        let mut session = ReviewSession::new();
        assert!(session.dashboard().is_none());
        session.apply_dashboard(DashboardSummary {
            total_reviews: 1,
            total_issues: 2,
            total_errors: 1,
            total_warnings: 1,
            total_optimizations: 0,
            total_security_issues: 0,
        });
        session.apply_dashboard(DashboardSummary {
            total_reviews: 2,
            total_issues: 4,
            total_errors: 2,
            total_warnings: 2,
            total_optimizations: 0,
            total_security_issues: 0,
        });
        assert_eq!(session.dashboard().unwrap().total_reviews, 2);
    }
}
