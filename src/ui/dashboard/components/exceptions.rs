//! Customer exceptions tab

use super::super::state::DashboardState;
use super::{panel, ready_or_placeholder};
use crate::api::types::ExceptionType;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};

pub fn render_exceptions(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Fill(1)])
        .split(area);

    render_search_line(f, chunks[0], state);

    let block = panel("CUSTOMER EXCEPTIONS", Color::Cyan);
    if ready_or_placeholder(f, chunks[1], block.clone(), &state.exceptions).is_none() {
        return;
    }

    let records = state.visible_exceptions();
    let rows: Vec<Row> = records
        .iter()
        .map(|record| {
            let type_color = match record.exception_type {
                ExceptionType::Include => Color::LightGreen,
                ExceptionType::Exclude => Color::LightRed,
            };
            Row::new(vec![
                Cell::from(record.id.to_string()),
                Cell::from(record.company_code.clone()),
                Cell::from(record.housebank.clone()),
                Cell::from(record.currency.clone()),
                Cell::from(record.business_partner.clone()),
                Cell::from(record.exception_type.to_string())
                    .style(Style::default().fg(type_color)),
                Cell::from(record.comment.clone().unwrap_or_default()),
            ])
        })
        .collect();

    let header = Row::new(vec![
        "ID", "Company", "House bank", "Currency", "Partner", "Type", "Comment",
    ])
    .style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );
    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(11),
            Constraint::Length(9),
            Constraint::Length(14),
            Constraint::Length(8),
            Constraint::Fill(1),
        ],
    )
    .header(header)
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ")
    .block(block);

    let mut table_state = TableState::default();
    if !records.is_empty() {
        table_state.select(Some(state.exception_view.selected));
    }
    f.render_stateful_widget(table, chunks[1], &mut table_state);
}

fn render_search_line(f: &mut Frame, area: Rect, state: &DashboardState) {
    let view = &state.exception_view;
    let line = if let Some(id) = view.pending_delete {
        Line::from(Span::styled(
            format!("Delete exception {}? [y/N]", id),
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        let cursor = if view.editing_query { "_" } else { "" };
        let style = if view.editing_query {
            Style::default().fg(Color::LightYellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        Line::from(vec![
            Span::styled("Search: ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{}{}", view.query, cursor), style),
        ])
    };
    f.render_widget(Paragraph::new(line), area);
}
