//! Rules panel renderer for revu.
//!
//! Renders the working rule set as a checkbox list. Shows "Loading rules..."
//! until the initial fetch lands; a fetch failure leaves the placeholder in
//! place permanently, which is the degradation policy for this panel.

use ratatui::{
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

use revu_core::rules::RuleStatus;

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::panel_block;

/// Renders the rules left panel.
///
/// Uses `render_stateful_widget` so the selection highlight is applied. The
/// panel title carries the save state so a failed save stays visible as an
/// ordinary unsaved marker.
pub fn render_rules(
    frame: &mut Frame,
    area: ratatui::layout::Rect,
    focus: PanelFocus,
    state: &mut AppState,
    theme: &Theme,
) {
    let is_focused = focus == PanelFocus::Rules;
    let title = match state.rules.status() {
        _ if !state.rules.is_loaded() => "Rules".to_owned(),
        RuleStatus::Saving => "Rules (saving...)".to_owned(),
        RuleStatus::Dirty => "Rules (unsaved)".to_owned(),
        RuleStatus::Clean => "Rules".to_owned(),
    };
    let block = panel_block(&title, is_focused, theme);

    let items: Vec<ListItem> = if !state.rules.is_loaded() {
        vec![ListItem::new(Line::raw("Loading rules..."))]
    } else {
        state
            .rules
            .rules()
            .iter()
            .map(|(name, &enabled)| rule_item(name, enabled, theme))
            .collect()
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(theme.border_active));

    frame.render_stateful_widget(list, area, &mut state.rules_state);
}

/// Converts one rule entry into a styled checkbox row.
fn rule_item(name: &str, enabled: bool, theme: &Theme) -> ListItem<'static> {
    let mark = if enabled {
        Span::styled("[x] ", Style::default().fg(theme.rule_enabled))
    } else {
        Span::styled("[ ] ", Style::default().fg(theme.rule_disabled))
    };
    ListItem::new(Line::from(vec![mark, Span::raw(name.to_owned())]))
}
