//! Help overlay renderer for revu.
//!
//! Draws a centred modal box over the existing panel layout using ratatui's
//! `Clear` widget to erase the background first. Rendered inside the same
//! `terminal.draw()` closure as all other panels.

use ratatui::{
    layout::Constraint,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
    Frame,
};

use crate::theme::Theme;

/// Renders the help overlay as a centred modal on top of the panel layout.
///
/// The paragraph scrolls vertically by `help_scroll` rows for short
/// terminals. Skipped entirely below 60 columns to avoid a zero-size `Rect`.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 60 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));

    // Erase the background behind the modal before drawing content.
    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help  — j/k scroll, ? or Esc to dismiss ")
        .border_style(ratatui::style::Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

/// Builds the help text, grouped by section.
fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Navigation"),
        Line::from("  j / k         Move / scroll down / up one line"),
        Line::from("  g / G         Jump to top / bottom"),
        Line::from("  Ctrl-d / u    Scroll half page down / up"),
        Line::from("  Ctrl-f / b    Scroll full page down / up"),
        Line::from("  H / L / Tab   Move panel focus"),
        Line::from(""),
        Line::from("Editor"),
        Line::from("  i             Edit the cursor line (Esc returns)"),
        Line::from("  a             Analyze the buffer"),
        Line::from("  u             Upload a file for analysis (path prompt)"),
        Line::from("  f             Change the tracked filename"),
        Line::from(""),
        Line::from("Rules"),
        Line::from("  Space / Enter Toggle the selected rule"),
        Line::from("  s             Save the rule set"),
        Line::from(""),
        Line::from("Reports"),
        Line::from("  x / X         Export report URL (HTML / TXT)"),
        Line::from("  R             Refresh the dashboard"),
        Line::from(""),
        Line::from("General"),
        Line::from("  j / k         Scroll this help overlay"),
        Line::from("  ?             Open / close this help overlay"),
        Line::from("  q / Esc       Quit (confirms if unsaved rule edits exist)"),
    ])
}
