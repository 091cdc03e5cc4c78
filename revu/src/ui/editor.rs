//! Editor panel renderer for revu.
//!
//! Renders the source buffer with a line-number gutter, per-line diagnostic
//! backgrounds, and the cached syntax-highlighted spans. Uses manual virtual
//! scrolling: only `lines[editor_scroll..editor_scroll+viewport]` are
//! materialized per frame, so rendering is O(viewport) not O(buffer).

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

use revu_core::diagnostics::LineClass;

use crate::app::{AppState, Mode, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Renders the editor centre panel.
///
/// Gutter numbers are 1-based to match the service's issue line numbers. The
/// line class of each visible line paints the whole row's background; the
/// cursor is drawn as a reversed cell while in Insert mode.
pub fn render_editor(
    frame: &mut Frame,
    area: ratatui::layout::Rect,
    focus: PanelFocus,
    state: &AppState,
    theme: &Theme,
) {
    let is_focused = focus == PanelFocus::Editor;
    let title = format!("Editor ({})", state.session.filename());
    let block = panel_block(&title, is_focused, theme);
    let inner = inner_rect(area);
    let viewport_height = inner.height as usize;

    frame.render_widget(block, area);

    let total = state.editor_lines.len();
    let visible_start = state.editor_scroll.min(total.saturating_sub(1));
    let visible_end = (visible_start + viewport_height).min(total);

    let items: Vec<ListItem> = (visible_start..visible_end)
        .map(|index| ListItem::new(editor_line(index, state, theme)))
        .collect();

    frame.render_widget(List::new(items), inner);
}

/// Builds one rendered editor row: gutter + content, class background applied.
fn editor_line(index: usize, state: &AppState, theme: &Theme) -> Line<'static> {
    let number = index + 1;
    let mut spans = vec![Span::styled(
        format!("{number:>4} "),
        Style::default().fg(theme.gutter),
    )];

    let editing_here = state.mode == Mode::Insert && index == state.cursor_line;
    if editing_here {
        spans.extend(cursor_line_spans(state));
    } else {
        spans.extend(state.editor_lines[index].spans.iter().cloned());
    }

    use ratatui::style::Stylize as _;
    let mut line = Line::from(spans);
    if let Some(bg) = class_background(state.session.classify_line(number as u32), theme) {
        line = line.bg(bg);
    } else if editing_here {
        line = line.fg(theme.cursor_line);
    }
    line
}

/// The cursor line, rendered unstyled with a reversed cell at the cursor.
///
/// Syntax highlighting is skipped for the line under edit: the reversed
/// cursor cell must split the text at an arbitrary character, which styled
/// span boundaries would not survive.
fn cursor_line_spans(state: &AppState) -> Vec<Span<'static>> {
    let text = state
        .session
        .buffer()
        .line(state.cursor_line)
        .unwrap_or_default()
        .to_owned();
    let chars: Vec<char> = text.chars().collect();
    let col = state.cursor_col.min(chars.len());

    let before: String = chars[..col].iter().collect();
    let at: String = chars.get(col).map(|c| c.to_string()).unwrap_or_else(|| " ".to_owned());
    let after: String = chars.get(col + 1..).map(|c| c.iter().collect()).unwrap_or_default();

    vec![
        Span::raw(before),
        Span::styled(at, Style::default().add_modifier(Modifier::REVERSED)),
        Span::raw(after),
    ]
}

/// Maps a diagnostic line class to its background color, if any.
fn class_background(class: LineClass, theme: &Theme) -> Option<ratatui::style::Color> {
    match class {
        LineClass::Error => Some(theme.line_error_bg),
        LineClass::Security => Some(theme.line_security_bg),
        LineClass::Warning => Some(theme.line_warning_bg),
        LineClass::None => None,
    }
}
