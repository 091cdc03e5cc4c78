//! Dashboard strip renderer for revu.
//!
//! Six aggregate counters across the top of the screen, one bordered card
//! each. "Loading dashboard..." until the first snapshot arrives; a failed
//! refresh keeps whatever was on screen (or the placeholder) — dashboard
//! failures never surface.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    widgets::{Block, Paragraph},
    Frame,
};

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::layout::inner_rect;

/// Renders the dashboard strip at the top of the frame.
pub fn render_dashboard(
    frame: &mut Frame,
    area: ratatui::layout::Rect,
    state: &AppState,
    theme: &Theme,
) {
    let Some(summary) = state.session.dashboard() else {
        let block = Block::bordered()
            .title("Dashboard")
            .border_style(Style::default().fg(theme.border_inactive));
        let inner = inner_rect(area);
        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new("Loading dashboard..."), inner);
        return;
    };

    let cards: [(&str, u64); 6] = [
        ("Reviews", summary.total_reviews),
        ("Issues", summary.total_issues),
        ("Errors", summary.total_errors),
        ("Warnings", summary.total_warnings),
        ("Optimizations", summary.total_optimizations),
        ("Security", summary.total_security_issues),
    ];

    let areas: [ratatui::layout::Rect; 6] = area.layout(
        &Layout::horizontal([Constraint::Ratio(1, 6); 6]).spacing(Spacing::Overlap(1)),
    );

    for ((title, value), card_area) in cards.into_iter().zip(areas) {
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(theme.border_inactive))
            .merge_borders(MergeStrategy::Fuzzy);
        let inner = inner_rect(card_area);
        frame.render_widget(block, card_area);
        frame.render_widget(
            Paragraph::new(value.to_string())
                .alignment(Alignment::Center)
                .style(
                    Style::default()
                        .fg(theme.dashboard_value)
                        .add_modifier(Modifier::BOLD),
                ),
            inner,
        );
    }
}
