//! Overview cards
//!
//! Renders the headline metrics for the selected period and filters

use super::super::state::DashboardState;
use super::super::utils::{format_currency, format_minutes, format_number};
use super::{panel, ready_or_placeholder};
use crate::api::types::OverviewMetrics;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Gauge, Paragraph};

/// Render the overview row above the trend chart.
pub fn render_overview(f: &mut Frame, area: Rect, state: &DashboardState) {
    let title = format!("OVERVIEW ({})", state.filter.state().period);
    let Some(metrics) = ready_or_placeholder(f, area, panel(title, Color::Cyan), &state.overview)
    else {
        return;
    };

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ])
        .split(area);

    render_stat_card(
        f,
        cards[0],
        "Total Payments",
        format_number(metrics.total_payments),
        vec![format!("Received {}", format_currency(metrics.total_received))],
    );
    render_gauge_card(
        f,
        cards[1],
        "Automation",
        metrics.automation_percentage,
        format!(
            "{} auto / {} manual",
            format_number(metrics.automated_count),
            format_number(metrics.manual_count)
        ),
    );
    render_gauge_card(
        f,
        cards[2],
        "Assigned to Customer",
        metrics.assigned_percentage,
        format!(
            "{} unassigned ({})",
            format_number(metrics.unassigned_count),
            format_currency(metrics.unassigned_value)
        ),
    );
    render_stat_card(
        f,
        cards[3],
        "Invoices Assigned",
        format_number(metrics.total_invoices_assigned),
        vec![
            format_currency(metrics.total_assigned_value),
            format!("{:.1}% of value", metrics.value_assigned_percentage),
        ],
    );
    render_stat_card(f, cards[4], "Avg Processing Time", String::new(), time_lines(metrics));
}

fn time_lines(metrics: &OverviewMetrics) -> Vec<String> {
    vec![
        format!("Auto:   {}", format_minutes(metrics.avg_auto_time_minutes)),
        format!("Manual: {}", format_minutes(metrics.avg_manual_time_minutes)),
    ]
}

fn render_stat_card(f: &mut Frame, area: Rect, title: &str, headline: String, details: Vec<String>) {
    let mut lines = Vec::new();
    if !headline.is_empty() {
        lines.push(Line::from(Span::styled(
            headline,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )));
    }
    lines.extend(
        details
            .into_iter()
            .map(|d| Line::from(Span::styled(d, Style::default().fg(Color::Gray)))),
    );
    f.render_widget(Paragraph::new(lines).block(panel(title, Color::Cyan)), area);
}

fn render_gauge_card(f: &mut Frame, area: Rect, title: &str, percent: f64, detail: String) {
    let color = if percent >= 80.0 {
        Color::LightGreen
    } else if percent >= 50.0 {
        Color::LightYellow
    } else {
        Color::LightRed
    };
    let gauge = Gauge::default()
        .block(panel(format!("{} - {}", title, detail), Color::Cyan))
        .gauge_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .ratio((percent / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.1}%", percent));
    f.render_widget(gauge, area);
}
