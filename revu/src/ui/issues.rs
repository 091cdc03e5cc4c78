//! Issues panel renderer for revu.
//!
//! Renders the current analysis result's findings as a scrollable paragraph:
//! category tag, line number, title, description, suggestion, and a colored
//! severity badge per issue, followed by the summary counters.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
    Frame,
};

use revu_core::types::{AnalysisResult, Issue, Severity};

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Renders the issues right panel.
///
/// Placeholders: "No analysis yet" before the first result, "No issues
/// found" for a clean result. Scrolls by `issues_scroll` rows.
pub fn render_issues(
    frame: &mut Frame,
    area: ratatui::layout::Rect,
    focus: PanelFocus,
    state: &AppState,
    theme: &Theme,
) {
    let is_focused = focus == PanelFocus::Issues;
    let title = match state.session.analysis() {
        Some(analysis) => format!("Issues ({})", analysis.issues.len()),
        None => "Issues".to_owned(),
    };
    let block = panel_block(&title, is_focused, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let text = match state.session.analysis() {
        None => Text::from("No analysis yet. Run it to see issues."),
        Some(analysis) if analysis.issues.is_empty() => {
            let mut lines = vec![Line::from("No issues found. Great job!"), Line::from("")];
            lines.extend(summary_lines(analysis, theme));
            Text::from(lines)
        }
        Some(analysis) => {
            let mut lines = Vec::new();
            for issue in &analysis.issues {
                lines.extend(issue_lines(issue, theme));
            }
            lines.extend(summary_lines(analysis, theme));
            Text::from(lines)
        }
    };

    frame.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .scroll((state.issues_scroll, 0)),
        inner,
    );
}

/// Builds the rendered lines for one issue.
fn issue_lines(issue: &Issue, theme: &Theme) -> Vec<Line<'static>> {
    let line_label = issue
        .line_number
        .map(|n| n.to_string())
        .unwrap_or_else(|| "N/A".to_owned());
    let (severity_label, severity_color) = match issue.severity {
        Severity::High => ("HIGH", theme.badge_high),
        Severity::Medium => ("MEDIUM", theme.badge_medium),
        Severity::Low => ("LOW", theme.badge_low),
    };

    vec![
        Line::from(vec![
            Span::styled(
                format!("[{:?}] ", issue.category).to_uppercase(),
                Style::default()
                    .fg(theme.issue_category)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("(Line {line_label}) {}", issue.title),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(format!("  {}", issue.description)),
        Line::from(vec![
            Span::raw("  Suggestion: "),
            Span::styled(
                issue.suggestion.clone(),
                Style::default().fg(theme.issue_suggestion),
            ),
        ]),
        Line::from(vec![
            Span::raw("  Severity: "),
            Span::styled(
                format!(" {severity_label} "),
                Style::default()
                    .fg(severity_color)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            ),
        ]),
        Line::from(""),
    ]
}

/// Builds the summary-report footer from the result's trusted counters.
fn summary_lines(analysis: &AnalysisResult, theme: &Theme) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            format!(
                "File: {} | Review ID: {}",
                analysis.filename, analysis.review_id
            ),
            Style::default().fg(theme.gutter),
        )),
        Line::from(Span::styled(
            format!(
                "Errors: {}  Warnings: {}  Optimizations: {}  Security: {}",
                analysis.error_count,
                analysis.warning_count,
                analysis.optimization_count,
                analysis.security_count
            ),
            Style::default().fg(theme.gutter),
        )),
    ]
}
