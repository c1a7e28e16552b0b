//! Live tab
//!
//! Company-status grid for today plus the most recent transactions.

use super::super::state::DashboardState;
use super::super::utils::{format_currency, format_number, format_time, get_status_color};
use super::{panel, ready_or_placeholder};
use crate::consts::cli_consts::MAX_RECENT_TRANSACTIONS;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, List, ListItem, Row, Table};

pub fn render_live(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_company_status(f, chunks[0], state);
    render_transactions(f, chunks[1], state);
}

fn render_company_status(f: &mut Frame, area: Rect, state: &DashboardState) {
    let updated = state.last_live_update.as_deref().unwrap_or("never");
    let title = format!(
        "COMPANY STATUS (updated {}, every {}s)",
        updated,
        state.live_interval.as_secs()
    );
    let block = panel(title, Color::Cyan);
    if ready_or_placeholder(f, area, block.clone(), &state.company_status).is_none() {
        return;
    }

    let rows: Vec<Row> = state
        .visible_company_status()
        .into_iter()
        .map(|status| {
            let color = get_status_color(status.processing_status());
            Row::new(vec![
                Cell::from(status.bank_account.clone()),
                Cell::from(status.status.clone()).style(Style::default().fg(color)),
                Cell::from(format!("{:.0}%", status.percentage)),
                Cell::from(format!(
                    "{}/{}",
                    format_number(status.processed),
                    format_number(status.total)
                )),
                Cell::from(format_number(status.pending)),
                Cell::from(format_time(status.start_time.as_deref())),
                Cell::from(format_time(status.end_time.as_deref())),
            ])
        })
        .collect();

    let header = Row::new(vec![
        "Account", "Status", "Done", "Processed", "Pending", "Start", "End",
    ])
    .style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );
    let table = Table::new(
        rows,
        [
            Constraint::Fill(2),
            Constraint::Length(12),
            Constraint::Length(5),
            Constraint::Length(11),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(block);
    f.render_widget(table, area);
}

fn render_transactions(f: &mut Frame, area: Rect, state: &DashboardState) {
    let block = panel("RECENT TRANSACTIONS", Color::Cyan);
    let Some(transactions) = ready_or_placeholder(f, area, block.clone(), &state.transactions)
    else {
        return;
    };

    let items: Vec<ListItem> = transactions
        .iter()
        .filter(|tx| state.filter.matches_company(&tx.company_code))
        .take(MAX_RECENT_TRANSACTIONS)
        .map(|tx| {
            let (marker, color) = if tx.is_automated() {
                ("AUTO  ", Color::LightGreen)
            } else {
                ("MANUAL", Color::LightYellow)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", marker), Style::default().fg(color)),
                Span::styled(
                    format!("{:>10} ", format_currency(tx.amount)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(tx.description(), Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();

    if items.is_empty() {
        let empty = List::new(vec![ListItem::new("No transactions yet today")])
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }
    f.render_widget(List::new(items).block(block), area);
}
