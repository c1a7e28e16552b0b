//! Dashboard header component
//!
//! Renders the title, the tab bar and the active filters

use super::super::state::{DashboardState, Tab};
use super::super::utils::format_uptime;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};

/// Render header with title, tabs and filter summary.
pub fn render_header(f: &mut Frame, area: Rect, state: &DashboardState) {
    let header_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let version = env!("CARGO_PKG_VERSION");
    let title = Paragraph::new(format!(
        "CASHWEB DASHBOARD v{}  |  {}  |  UP {}",
        version,
        state.api_url,
        format_uptime(state.start_time.elapsed())
    ))
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Thick),
        );
    f.render_widget(title, header_chunks[0]);

    let titles: Vec<String> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| format!("{} {}", i + 1, tab))
        .collect();
    let tabs = Tabs::new(titles)
        .select(state.tab.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, header_chunks[1]);

    f.render_widget(Paragraph::new(filter_line(state)), header_chunks[2]);
}

fn filter_line(state: &DashboardState) -> Line<'static> {
    let filters = state.filter.state();
    let label = |name: &str| Span::styled(format!("{}: ", name), Style::default().fg(Color::DarkGray));
    let value = |text: String| Span::styled(text, Style::default().fg(Color::White));
    let or_all = |value: Option<String>| value.unwrap_or_else(|| "All".to_string());

    let mut spans = vec![
        label("Period"),
        value(filters.period.to_string()),
        Span::raw("  "),
        label("Chart"),
        value(format!(
            "{} / {}",
            filters.chart_period,
            filters.chart_metric.title()
        )),
        Span::raw("  "),
        label("Region"),
        value(or_all(filters.region.map(|r| r.to_string()))),
        Span::raw("  "),
        label("Company"),
        value(or_all(filters.company_code.clone())),
        Span::raw("  "),
        label("Account"),
        value(or_all(state.filter.bank_account_label())),
    ];
    if let Some(error) = &state.filter_options_error {
        spans.push(Span::styled(
            format!("  (filter options unavailable: {})", error),
            Style::default().fg(Color::LightRed),
        ));
    }
    Line::from(spans)
}
