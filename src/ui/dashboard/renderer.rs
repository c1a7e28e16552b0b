//! Dashboard main renderer

use super::components::{exceptions, footer, header, insights, live, logs, modal, overview, trend};
use super::state::{DashboardState, Tab};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Style};
use ratatui::widgets::Block;

pub fn render_dashboard(f: &mut Frame, state: &DashboardState) {
    if state.with_background_color {
        f.render_widget(
            Block::default().style(Style::default().bg(Color::Rgb(16, 20, 24))),
            f.area(),
        );
    }

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Length(8),
            Constraint::Length(2),
        ])
        .margin(1)
        .split(f.area());

    header::render_header(f, main_chunks[0], state);
    render_tab(f, main_chunks[1], state);
    logs::render_logs_panel(f, main_chunks[2], state);
    footer::render_footer(f, main_chunks[3], state);

    modal::render_overlays(f, f.area(), state);
}

fn render_tab(f: &mut Frame, area: Rect, state: &DashboardState) {
    match state.tab {
        Tab::Overview => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(6), Constraint::Fill(1)])
                .split(area);
            overview::render_overview(f, chunks[0], state);
            trend::render_trend(f, chunks[1], state);
        }
        Tab::Live => live::render_live(f, area, state),
        Tab::Exceptions => exceptions::render_exceptions(f, area, state),
        Tab::Insights => insights::render_insights(f, area, state),
    }
}
