//! Integration test for the review-session lifecycle.
//!
//! Exercises the controller end-to-end the way the event loop drives it:
//! edit, analyze, settle, upload, race a stale response, refresh the
//! dashboard, and walk the rule store through toggle/save/failure.

use revu_core::diagnostics::LineClass;
use revu_core::rules::{RuleError, RuleStatus, RuleStore};
use revu_core::session::{AnalyzeStatus, ReviewSession};
use revu_core::types::{
    AnalysisResult, DashboardSummary, Issue, IssueCategory, RuleSet, Severity,
};

fn issue(line: Option<u32>, category: IssueCategory, severity: Severity) -> Issue {
    Issue {
        id: None,
        line_number: line,
        category,
        severity,
        title: "t".to_owned(),
        description: "d".to_owned(),
        suggestion: "s".to_owned(),
    }
}

fn result(review_id: i64, issues: Vec<Issue>) -> AnalysisResult {
    let error_count = issues
        .iter()
        .filter(|i| i.category == IssueCategory::Error)
        .count() as u32;
    AnalysisResult {
        review_id,
        filename: "MyClass.java".to_owned(),
        issues,
        error_count,
        warning_count: 0,
        optimization_count: 0,
        security_count: 0,
    }
}

fn summary(total_reviews: u64) -> DashboardSummary {
    DashboardSummary {
        total_reviews,
        total_issues: 0,
        total_errors: 0,
        total_warnings: 0,
        total_optimizations: 0,
        total_security_issues: 0,
    }
}

#[test]
fn full_review_lifecycle() {
    let mut session = ReviewSession::new();

    // The session starts with the placeholder document and no analysis.
    assert!(session.buffer().serialize().starts_with("// Paste"));
    assert_eq!(session.filename(), "MyClass.java");
    assert!(session.analysis().is_none());
    assert_eq!(*session.status(), AnalyzeStatus::Idle);

    // Edit a line, then submit. The ticket carries the exact serialization.
    session.set_line(0, "class MyClass {}");
    let ticket = session.begin_analyze_text().expect("submission granted");
    assert_eq!(ticket.code, "class MyClass {}\n");
    assert_eq!(ticket.filename, "MyClass.java");
    assert!(session.is_analyzing());

    // While in flight, both submission paths are disabled.
    assert!(session.begin_analyze_text().is_none());
    assert!(session.begin_analyze_file().is_none());

    // Settle with issues on line 3: ERROR wins the tie against SECURITY.
    let settled = session.settle_analyze_ok(
        ticket.seq,
        result(
            1,
            vec![
                issue(Some(3), IssueCategory::Security, Severity::High),
                issue(Some(3), IssueCategory::Error, Severity::High),
                issue(Some(5), IssueCategory::Optimization, Severity::Low),
                issue(None, IssueCategory::Warning, Severity::Medium),
            ],
        ),
    );
    assert!(settled);
    assert_eq!(*session.status(), AnalyzeStatus::Idle);
    assert_eq!(session.classify_line(3), LineClass::Error);
    assert_eq!(session.classify_line(5), LineClass::Warning);
    assert_eq!(session.classify_line(4), LineClass::None);

    // The dashboard refresh that follows a settlement is best-effort: a
    // failure never calls apply_dashboard, and the result above survives.
    assert!(session.dashboard().is_none());
    assert_eq!(session.analysis().unwrap().review_id, 1);

    // A refresh that does arrive replaces the snapshot wholesale.
    session.apply_dashboard(summary(7));
    session.apply_dashboard(summary(8));
    assert_eq!(session.dashboard().unwrap().total_reviews, 8);

    // Upload: buffer content, filename, and result change together.
    let seq = session.begin_analyze_file().expect("submission granted");
    assert!(session.settle_upload_ok(
        seq,
        result(2, Vec::new()),
        "Uploaded.java",
        "class Uploaded {}\n",
    ));
    assert_eq!(session.filename(), "Uploaded.java");
    assert_eq!(session.buffer().line(0), Some("class Uploaded {}"));
    assert_eq!(session.analysis().unwrap().review_id, 2);
    // The previous result's line classes are gone with it.
    assert_eq!(session.classify_line(3), LineClass::None);
}

#[test]
fn stale_response_cannot_overwrite_a_later_settlement() {
    let mut session = ReviewSession::new();
    session.set_line(0, "class A {}");

    // Request A is issued and its transport errors out (say, a timeout)...
    let a = session.begin_analyze_text().unwrap();
    assert!(session.settle_analyze_err(a.seq, "Something went wrong while analyzing."));

    // ...request B is issued afterwards and settles first with a result...
    let b = session.begin_analyze_text().unwrap();
    assert!(session.settle_analyze_ok(b.seq, result(20, Vec::new())));

    // ...and then A's actual response arrives late. It must be discarded:
    // both the success and the failure form.
    assert!(!session.settle_analyze_ok(a.seq, result(10, Vec::new())));
    assert!(!session.settle_analyze_err(a.seq, "late failure"));

    assert_eq!(session.analysis().unwrap().review_id, 20);
    assert_eq!(*session.status(), AnalyzeStatus::Idle);
}

#[test]
fn empty_submission_never_reaches_the_network() {
    let mut session = ReviewSession::new();
    session.set_line(0, "");
    session.set_line(1, "");

    assert!(session.begin_analyze_text().is_none());
    let AnalyzeStatus::Error(message) = session.status() else {
        panic!("expected validation error, got {:?}", session.status());
    };
    assert_eq!(message, "Please enter some code.");

    // The error is not sticky: the next submission clears it immediately.
    session.set_line(0, "class A {}");
    assert!(session.begin_analyze_text().is_some());
    assert_eq!(*session.status(), AnalyzeStatus::Analyzing);
}

#[test]
fn rule_store_lifecycle() {
    let mut store = RuleStore::new();

    // Toggling before the initial fetch is an invalid state, not a panic.
    assert_eq!(store.toggle("long-line"), Err(RuleError::NotLoaded));
    assert_eq!(store.begin_save(), Err(RuleError::NotLoaded));

    store.load_complete(RuleSet::from([
        ("long-line".to_owned(), true),
        ("nested-loop".to_owned(), true),
        ("unused-import".to_owned(), false),
    ]));
    assert_eq!(store.status(), RuleStatus::Clean);

    // Optimistic toggle: working generation only.
    store.toggle("long-line").unwrap();
    assert_eq!(store.status(), RuleStatus::Dirty);
    assert_eq!(store.rules()["long-line"], false);

    // The save payload is the working generation at begin_save time, and a
    // second save while one is in flight is rejected.
    let payload = store.begin_save().unwrap();
    assert_eq!(payload["long-line"], false);
    assert_eq!(store.status(), RuleStatus::Saving);
    assert_eq!(store.begin_save(), Err(RuleError::SaveInFlight));

    // Failure: no rollback, edits intact, back to Dirty and re-attemptable.
    store.toggle("nested-loop").unwrap();
    store.save_failed();
    assert_eq!(store.status(), RuleStatus::Dirty);
    assert_eq!(store.rules()["long-line"], false);
    assert_eq!(store.rules()["nested-loop"], false);

    // Retry and succeed: everything toggled so far is acknowledged.
    store.begin_save().unwrap();
    store.save_succeeded();
    assert_eq!(store.status(), RuleStatus::Clean);
}
