//! UI rendering module for revu.
//!
//! Module root for `ui/`. Re-exports `render()` as the single entry point
//! called by the event loop's `terminal.draw()` closure.
//!
//! Layout arithmetic lives in `layout.rs`; each panel has its own renderer
//! module. The keybinding dispatcher also lives here (`keybindings`) because
//! it is the write-side counterpart of what these renderers read.

pub mod dashboard;
pub mod editor;
pub mod help;
pub mod issues;
pub mod keybindings;
mod layout;
pub mod rules_panel;

use ratatui::{
    layout::Constraint,
    style::Style,
    text::Line,
    widgets::{Block, Clear, Paragraph},
    Frame,
};

use crate::app::{AppState, Mode, PromptKind};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_status_bar};

/// Renders one complete frame: dashboard strip, 3-panel layout, status bar,
/// and any active overlay.
///
/// Called exactly once per `AppEvent::Render` inside `terminal.draw()` —
/// the only location where `terminal.draw()` is called in the application.
///
/// After computing the layout, viewport heights are written back into
/// `state` so scroll operations triggered by the *next* keypress can compute
/// page distances. The one-frame lag is imperceptible in practice.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [dashboard_area, rules_area, editor_area, issues_area, status_area] =
        compute_layout(frame);

    // Cache viewport heights BEFORE rendering panels so they are available
    // for the next keypress cycle.
    state.rules_viewport_height = inner_rect(rules_area).height;
    state.editor_viewport_height = inner_rect(editor_area).height;
    state.issues_viewport_height = inner_rect(issues_area).height;

    let focus = state.focus;

    dashboard::render_dashboard(frame, dashboard_area, state, theme);

    // Side panels are collapsed to zero width on narrow terminals.
    if rules_area.width > 0 {
        rules_panel::render_rules(frame, rules_area, focus, state, theme);
    }

    editor::render_editor(frame, editor_area, focus, state, theme);

    if issues_area.width > 0 {
        issues::render_issues(frame, issues_area, focus, state, theme);
    }

    render_status_bar(frame, status_area, state, theme);

    // Overlays render after all panels so they sit on top.
    match state.mode {
        Mode::HelpOverlay => help::render_help_overlay(frame, theme, state.help_scroll),
        Mode::Prompt(kind) => render_prompt(frame, state, kind, theme),
        Mode::ConfirmQuit => render_confirm_quit(frame, theme),
        _ => {}
    }
}

/// Renders the single-line input prompt as a small centred modal.
fn render_prompt(frame: &mut Frame, state: &AppState, kind: PromptKind, theme: &Theme) {
    let title = match kind {
        PromptKind::UploadPath => " Upload file — path (Enter to submit, Esc to cancel) ",
        PromptKind::Filename => " Filename (Enter to apply, Esc to cancel) ",
    };
    let area = frame
        .area()
        .centered(Constraint::Percentage(60), Constraint::Length(3));

    frame.render_widget(Clear, area);
    let block = Block::bordered()
        .title(title)
        .border_style(Style::default().fg(theme.border_active));
    let inner = inner_rect(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(Line::from(format!("{}▏", state.prompt_input))),
        inner,
    );
}

/// Renders the quit-confirmation dialog shown when rule edits are unsaved.
fn render_confirm_quit(frame: &mut Frame, theme: &Theme) {
    let area = frame
        .area()
        .centered(Constraint::Percentage(50), Constraint::Length(3));

    frame.render_widget(Clear, area);
    let block = Block::bordered()
        .title(" Unsaved rule changes ")
        .border_style(Style::default().fg(theme.border_active));
    let inner = inner_rect(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new("Quit without saving? (y/n)"),
        inner,
    );
}
