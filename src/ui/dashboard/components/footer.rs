//! Dashboard footer component
//!
//! Renders the key hints of the active tab

use super::super::state::{DashboardState, Tab};

use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// Render footer with key hints.
pub fn render_footer(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let refresh = if state.live_refresh_in_flight {
        "[R] Refreshing..."
    } else {
        "[R] Refresh"
    };
    let tab_keys = match state.tab {
        Tab::Overview => "[M] Metric | [←/→] Point",
        Tab::Live => "",
        Tab::Exceptions => "[A] Add | [E] Edit | [D] Delete | [/] Search | [L] Reload",
        Tab::Insights => "[I] Reload",
    };
    let mut footer_text = format!(
        "[Q] Quit | [Tab] Next | {} | [P] Period | [C] Chart period | [G] Region | [O] Company | [B] Account | [X] Clear | [F] Reload filters",
        refresh
    );
    if !tab_keys.is_empty() {
        footer_text.push_str(" | ");
        footer_text.push_str(tab_keys);
    }

    let footer = Paragraph::new(footer_text)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_type(BorderType::Thick),
        );
    f.render_widget(footer, area);
}
