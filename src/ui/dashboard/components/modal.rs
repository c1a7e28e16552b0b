//! Overlays: the exception editor modal and blocking alerts

use super::super::state::{Alert, DashboardState};
use super::panel;
use crate::exceptions::{ExceptionEditor, FormField};

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph, Wrap};

/// Draw whichever overlays are open. The alert goes on top.
pub fn render_overlays(f: &mut Frame, area: Rect, state: &DashboardState) {
    if let Some(editor) = &state.editor {
        render_editor(f, area, editor);
    }
    if let Some(alert) = &state.alert {
        render_alert(f, area, alert);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

fn render_editor(f: &mut Frame, area: Rect, editor: &ExceptionEditor) {
    let title = match editor.form.id {
        Some(id) => format!("EDIT EXCEPTION {}", id),
        None => "ADD EXCEPTION".to_string(),
    };
    let popup = centered(area, 64, FormField::ALL.len() as u16 + 7);
    f.render_widget(Clear, popup);

    let mut lines = Vec::new();
    if editor.loading {
        lines.push(Line::from(Span::styled(
            "Loading record...",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for field in FormField::ALL {
            let focused = field == editor.focus;
            let label_style = if focused {
                Style::default()
                    .fg(Color::LightYellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let mut value = editor.form.value(field);
            if field == FormField::ExceptionType {
                if value.is_empty() {
                    value = "(space to choose)".to_string();
                }
            } else if focused {
                value.push('_');
            }
            lines.push(Line::from(vec![
                Span::styled(format!("{:<18}", field.to_string()), label_style),
                Span::styled(value, Style::default().fg(Color::White)),
            ]));
        }
    }

    lines.push(Line::from(""));
    if let Some(error) = &editor.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::LightRed),
        )));
    }
    let hint = match (editor.saving, editor.is_edit()) {
        (true, true) => "Updating...",
        (true, false) => "Creating...",
        (false, true) => "[Tab] Next field | [Enter] Update | [Esc] Cancel",
        (false, false) => "[Tab] Next field | [Enter] Create | [Esc] Cancel",
    };
    lines.push(Line::from(Span::styled(
        hint,
        Style::default().fg(Color::DarkGray),
    )));

    f.render_widget(
        Paragraph::new(lines).block(panel(title, Color::LightYellow)),
        popup,
    );
}

fn render_alert(f: &mut Frame, area: Rect, alert: &Alert) {
    let popup = centered(area, 56, 7);
    f.render_widget(Clear, popup);
    let lines = vec![
        Line::from(Span::styled(
            alert.message.clone(),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] OK",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(panel(alert.title.to_uppercase(), Color::LightRed));
    f.render_widget(widget, popup);
}
