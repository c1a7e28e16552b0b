//! Insights tab
//!
//! One key/value panel per summary endpoint.

use super::super::state::{DashboardState, SectionState};
use super::{panel, ready_or_placeholder};
use crate::api::types::InsightKind;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::prelude::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

pub fn render_insights(f: &mut Frame, area: Rect, state: &DashboardState) {
    let rows = Layout::vertical([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).split(area);
    let cells: Vec<Rect> = rows
        .iter()
        .flat_map(|row| {
            Layout::horizontal([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(*row)
            .to_vec()
        })
        .collect();

    for (kind, cell) in InsightKind::ALL.into_iter().zip(cells) {
        render_insight(f, cell, state, kind);
    }
}

fn render_insight(f: &mut Frame, area: Rect, state: &DashboardState, kind: InsightKind) {
    let block = panel(kind.title().to_uppercase(), Color::Cyan);
    let loading = SectionState::Loading;
    let section = state.insights.get(&kind).unwrap_or(&loading);
    let Some(report) = ready_or_placeholder(f, area, block.clone(), section) else {
        return;
    };

    let lines: Vec<Line> = if report.entries.is_empty() {
        vec![Line::from(Span::styled(
            "No data",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        report
            .entries
            .iter()
            .map(|(key, value)| {
                Line::from(vec![
                    Span::styled(format!("{}: ", key), Style::default().fg(Color::Gray)),
                    Span::styled(value.clone(), Style::default().fg(Color::White)),
                ])
            })
            .collect()
    };
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}
