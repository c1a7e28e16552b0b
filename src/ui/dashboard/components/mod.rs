//! Dashboard component modules
//!
//! Contains all individual rendering components

pub mod exceptions;
pub mod footer;
pub mod header;
pub mod insights;
pub mod live;
pub mod logs;
pub mod modal;
pub mod overview;
pub mod trend;

use super::state::SectionState;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::prelude::{Color, Style};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};

/// Rounded panel used by every section.
pub fn panel(title: impl Into<String>, color: Color) -> Block<'static> {
    Block::default()
        .title(title.into())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .padding(Padding::horizontal(1))
}

/// Draws the loading or error placeholder and returns `None`, or hands back
/// the loaded value for the caller to draw.
pub fn ready_or_placeholder<'a, T>(
    f: &mut Frame,
    area: Rect,
    block: Block<'static>,
    section: &'a SectionState<T>,
) -> Option<&'a T> {
    let (text, color) = match section {
        SectionState::Ready(value) => return Some(value),
        SectionState::Loading => ("Loading...".to_string(), Color::DarkGray),
        SectionState::Failed(error) => (format!("Error loading data: {}", error), Color::LightRed),
    };
    let placeholder = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(placeholder, area);
    None
}
