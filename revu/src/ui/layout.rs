//! Responsive layout engine for revu.
//!
//! Pure layout arithmetic — no mutable application state lives here. Called
//! inside `terminal.draw()` on every render so every frame reflects the
//! current terminal size.
//!
//! # Geometry
//!
//! A 3-row dashboard strip sits on top, then the main 3-panel area (rules /
//! editor / issues at 24 / 46 / 30 percent), then a 1-row status bar. Below
//! 100 columns both side panels collapse and the editor fills the width.
//!
//! `Spacing::Overlap(1)` with `Block::merge_borders(MergeStrategy::Fuzzy)`
//! makes adjacent panel borders share a single column and merge their
//! junction box-drawing characters.

use ratatui::{
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
    Frame,
};

use revu_core::rules::RuleStatus;
use revu_core::session::AnalyzeStatus;

use crate::app::{AppState, Mode};
use crate::theme::Theme;

/// Returns `[dashboard, rules, editor, issues, status_bar]` for this frame.
///
/// The returned `Rect`s are valid only for the current draw closure — never
/// store them across frames.
pub fn compute_layout(frame: &Frame) -> [Rect; 5] {
    let term_width = frame.area().width;

    let [dashboard, main_area, status_bar] = frame.area().layout(&Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ]));

    // Collapse the side panels on narrow terminals.
    let horizontal = if term_width >= 100 {
        Layout::horizontal([
            Constraint::Percentage(24),
            Constraint::Percentage(46),
            Constraint::Percentage(30),
        ])
        .spacing(Spacing::Overlap(1))
    } else {
        Layout::horizontal([
            Constraint::Length(0),
            Constraint::Fill(1),
            Constraint::Length(0),
        ])
        .spacing(Spacing::Overlap(1))
    };

    let [rules, editor, issues] = main_area.layout(&horizontal);

    [dashboard, rules, editor, issues, status_bar]
}

/// Returns the inner `Rect` of a panel after removing the 1-cell border.
///
/// Used both for rendering content and for caching viewport heights in
/// `AppState` before panels are rendered.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered `Block` for a panel.
///
/// `BorderType::Thick` when the panel is focused, `Plain` otherwise.
/// `MergeStrategy::Fuzzy` because `Exact` produces incorrect junctions when
/// mixing `Thick` and `Plain` borders.
pub fn panel_block<'a>(title: &'a str, is_focused: bool, theme: &'a Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Renders the 1-row status bar at the bottom of the terminal.
///
/// Left to right: mode indicator, analyze state (progress or error), rules
/// save state, and any transient message. Never renders blank — the mode
/// indicator is always present.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::Insert => (" INSERT ", theme.status_mode_insert),
        Mode::Prompt(_) => (" PROMPT ", theme.status_mode_insert),
        Mode::Normal | Mode::ConfirmQuit | Mode::HelpOverlay => {
            (" NORMAL ", theme.status_mode_normal)
        }
    };

    let mut spans = vec![Span::styled(
        mode_text,
        Style::default().fg(mode_fg).add_modifier(Modifier::BOLD),
    )];

    match state.session.status() {
        AnalyzeStatus::Analyzing => {
            spans.push(Span::styled(
                " Analyzing... ",
                Style::default().fg(theme.status_busy),
            ));
        }
        AnalyzeStatus::Error(message) => {
            spans.push(Span::styled(
                format!(" {message} "),
                Style::default()
                    .fg(theme.status_error)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        AnalyzeStatus::Idle => {}
    }

    match state.rules.status() {
        RuleStatus::Saving => {
            spans.push(Span::styled(
                " Saving rules... ",
                Style::default().fg(theme.status_busy),
            ));
        }
        RuleStatus::Dirty => {
            spans.push(Span::styled(
                " rules unsaved ",
                Style::default().fg(theme.status_busy),
            ));
        }
        RuleStatus::Clean => {}
    }

    if let Some(message) = &state.status_message {
        spans.push(Span::raw(format!(" {message}")));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
