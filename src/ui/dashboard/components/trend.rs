//! Trend chart component
//!
//! Draws the mounted trend chart as a line or grouped bar chart, with the
//! tooltip of the point under the cursor underneath.

use super::super::state::{DashboardState, SectionState};
use super::panel;
use crate::chart::{ChartKind, TrendChart};

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Bar, BarChart, BarGroup, Chart, Dataset, GraphType, Paragraph};

const SERIES_COLORS: [Color; 2] = [Color::LightCyan, Color::LightMagenta];

pub fn render_trend(f: &mut Frame, area: Rect, state: &DashboardState) {
    let title = format!(
        "AUTOMATION TREND - {} ({})",
        state.filter.state().chart_metric.title(),
        state.filter.state().chart_period
    );
    let block = panel(title, Color::Cyan);

    let chart = match (&state.trend, state.canvas.chart()) {
        (SectionState::Ready(_), Some(chart)) if !chart.is_empty() => chart,
        (SectionState::Failed(error), _) => {
            let text = Paragraph::new(format!("Error loading chart: {}", error))
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::LightRed))
                .block(block);
            f.render_widget(text, area);
            return;
        }
        (SectionState::Ready(_), _) => {
            let text = Paragraph::new("No data for the selected period")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            f.render_widget(text, area);
            return;
        }
        (SectionState::Loading, _) => {
            let text = Paragraph::new("Loading...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            f.render_widget(text, area);
            return;
        }
    };

    let inner = block.inner(area);
    f.render_widget(block, area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(2)])
        .split(inner);

    match chart.kind {
        ChartKind::Line => render_line_chart(f, chunks[0], chart, state.canvas.cursor()),
        ChartKind::Bar => render_bar_chart(f, chunks[0], chart),
    }
    render_tooltip(f, chunks[1], state);
}

fn render_line_chart(f: &mut Frame, area: Rect, chart: &TrendChart, cursor: usize) {
    let points: Vec<Vec<(f64, f64)>> = chart.series.iter().map(|s| s.points()).collect();
    let [low, high] = chart.y_bounds;
    let cursor_line = [(cursor as f64, low), (cursor as f64, high)];
    let mut datasets = chart
        .series
        .iter()
        .zip(points.iter())
        .zip(SERIES_COLORS)
        .map(|((series, data), color)| {
            Dataset::default()
                .name(format!("{} %", series.name))
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(data)
        })
        .collect::<Vec<_>>();
    if !chart.is_empty() {
        datasets.push(
            Dataset::default()
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::DarkGray))
                .data(&cursor_line),
        );
    }

    let last = chart.len().saturating_sub(1);
    let x_labels: Vec<Span> = [0, last / 2, last]
        .iter()
        .filter_map(|i| chart.labels.get(*i))
        .map(|label| Span::raw(label.clone()))
        .collect();

    let widget = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, last.max(1) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([low, high])
                .labels(vec![
                    Span::raw(chart.format_value(low)),
                    Span::raw(chart.format_value((low + high) / 2.0)),
                    Span::raw(chart.format_value(high)),
                ]),
        );
    f.render_widget(widget, area);
}

fn render_bar_chart(f: &mut Frame, area: Rect, chart: &TrendChart) {
    let groups: Vec<BarGroup> = (0..chart.len())
        .map(|i| {
            let bars: Vec<Bar> = chart
                .series
                .iter()
                .zip(SERIES_COLORS)
                .map(|(series, color)| {
                    let value = series.values.get(i).copied().unwrap_or(0.0).max(0.0);
                    Bar::default()
                        .value(value.round() as u64)
                        .style(Style::default().fg(color))
                })
                .collect();
            let label = chart.labels.get(i).cloned().unwrap_or_default();
            BarGroup::default().label(Line::from(label)).bars(&bars)
        })
        .collect();

    let mut widget = BarChart::default()
        .bar_width(3)
        .bar_gap(0)
        .group_gap(2)
        .max(chart.y_bounds[1].ceil() as u64);
    for group in groups {
        widget = widget.data(group);
    }
    f.render_widget(widget, area);
}

fn render_tooltip(f: &mut Frame, area: Rect, state: &DashboardState) {
    let Some(tooltip) = state.canvas.tooltip() else {
        return;
    };
    let mut spans = vec![Span::styled(
        format!("{}: ", tooltip.label),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )];
    for (line, color) in tooltip.lines.iter().zip(SERIES_COLORS) {
        spans.push(Span::styled(format!("{}  ", line), Style::default().fg(color)));
    }
    let mut lines = vec![Line::from(spans)];
    if let Some(footer) = tooltip.footer {
        lines.push(Line::from(Span::styled(
            footer,
            Style::default().fg(Color::DarkGray),
        )));
    }
    f.render_widget(Paragraph::new(lines), area);
}
