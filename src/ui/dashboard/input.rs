//! Dashboard key handling
//!
//! Keys mutate the view state directly and return the commands the refresh
//! coordinator has to run.

use super::state::{DashboardState, Tab};
use crate::exceptions::ExceptionEditor;
use crate::workers::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

impl DashboardState {
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Command> {
        // A blocking alert swallows everything until dismissed
        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.alert = None;
            }
            return Vec::new();
        }
        if self.editor.is_some() {
            return self.handle_editor_key(key);
        }
        if self.exception_view.pending_delete.is_some() {
            return self.handle_delete_confirmation(key);
        }
        if self.exception_view.editing_query {
            self.handle_query_key(key);
            return Vec::new();
        }

        match key.code {
            KeyCode::Tab => {
                self.tab = self.tab.next();
                Vec::new()
            }
            KeyCode::BackTab => {
                self.tab = self.tab.previous();
                Vec::new()
            }
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.tab = Tab::ALL[index];
                Vec::new()
            }
            KeyCode::Char('r') => self.request_live_refresh(),
            KeyCode::Char('p') => {
                let next = self.filter.state().period.next();
                self.filter.set_period(next);
                vec![Command::PeriodChanged(self.filter.query())]
            }
            KeyCode::Char('c') => {
                let next = self.filter.state().chart_period.next();
                self.filter.set_chart_period(next);
                vec![Command::ChartPeriodChanged(self.filter.query())]
            }
            KeyCode::Char('m') => {
                // Re-render from the held series, nothing to fetch
                let next = self.filter.state().chart_metric.next();
                self.filter.set_chart_metric(next);
                self.redraw_chart();
                Vec::new()
            }
            KeyCode::Char('g') => {
                self.filter.cycle_region();
                vec![Command::FilterChanged(self.filter.query())]
            }
            KeyCode::Char('o') => {
                self.filter.cycle_company_code();
                vec![Command::FilterChanged(self.filter.query())]
            }
            KeyCode::Char('b') => {
                self.filter.cycle_bank_account();
                vec![Command::FilterChanged(self.filter.query())]
            }
            KeyCode::Char('f') => vec![Command::RefreshFilterOptions],
            KeyCode::Char('x') => {
                self.filter.clear();
                vec![Command::FilterChanged(self.filter.query())]
            }
            _ => match self.tab {
                Tab::Overview => {
                    self.handle_chart_key(key);
                    Vec::new()
                }
                Tab::Exceptions => self.handle_exceptions_key(key),
                Tab::Insights if key.code == KeyCode::Char('i') => {
                    vec![Command::RefreshInsights(self.filter.query())]
                }
                _ => Vec::new(),
            },
        }
    }

    /// Manual refresh, ignored while the previous one is still running.
    fn request_live_refresh(&mut self) -> Vec<Command> {
        if self.live_refresh_in_flight {
            return Vec::new();
        }
        self.live_refresh_in_flight = true;
        vec![Command::RefreshLive]
    }

    fn handle_chart_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => self.canvas.move_cursor_left(),
            KeyCode::Right => self.canvas.move_cursor_right(),
            _ => {}
        }
    }

    fn handle_exceptions_key(&mut self, key: KeyEvent) -> Vec<Command> {
        let visible = self.visible_exceptions().len();
        match key.code {
            KeyCode::Up => self.exception_view.select_previous(),
            KeyCode::Down => self.exception_view.select_next(visible),
            KeyCode::Char('/') => self.exception_view.editing_query = true,
            KeyCode::Char('a') => self.editor = Some(ExceptionEditor::add()),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = self.selected_exception_id() {
                    self.editor = Some(ExceptionEditor::edit(id));
                    return vec![Command::OpenExceptionForEdit(id)];
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_exception_id() {
                    self.exception_view.request_delete(id);
                }
            }
            KeyCode::Char('l') => return vec![Command::RefreshExceptions],
            _ => {}
        }
        Vec::new()
    }

    fn handle_delete_confirmation(&mut self, key: KeyEvent) -> Vec<Command> {
        let confirmed = matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'));
        match self.exception_view.confirm_delete(confirmed) {
            Some(id) => vec![Command::DeleteException(id)],
            None => Vec::new(),
        }
    }

    fn handle_query_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.exception_view.editing_query = false,
            KeyCode::Backspace => {
                self.exception_view.query.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.exception_view.query.push(c);
            }
            _ => {}
        }
        let visible = self.visible_exceptions().len();
        self.exception_view.clamp(visible);
    }

    fn handle_editor_key(&mut self, key: KeyEvent) -> Vec<Command> {
        let Some(editor) = self.editor.as_mut() else {
            return Vec::new();
        };
        match key.code {
            KeyCode::Esc => {
                if !editor.saving {
                    self.editor = None;
                }
            }
            KeyCode::Tab | KeyCode::Down => editor.focus_next(),
            KeyCode::BackTab | KeyCode::Up => editor.focus_previous(),
            KeyCode::Backspace => editor.backspace(),
            KeyCode::Enter => match editor.submit() {
                Ok(Some((id, payload))) => return vec![Command::SaveException { id, payload }],
                Ok(None) => {}
                Err(e) => editor.error = Some(e.to_string()),
            },
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                editor.type_char(c)
            }
            _ => {}
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{CustomerException, ExceptionType};
    use crate::events::{Event, SectionData};
    use crate::exceptions::FormField;
    use crate::filters::{CascadingFilter, Period, Region};
    use crate::ui::app::UIConfig;
    use std::time::{Duration, Instant};

    fn state() -> DashboardState {
        DashboardState::new(
            CascadingFilter::default(),
            Instant::now(),
            UIConfig::new(false, "http://localhost:5000".to_string(), Duration::from_secs(300)),
        )
    }

    fn press(state: &mut DashboardState, code: KeyCode) -> Vec<Command> {
        state.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn with_exceptions(state: &mut DashboardState) {
        let record = CustomerException {
            id: 11,
            company_code: "0010".to_string(),
            housebank: "1050D".to_string(),
            currency: "EUR".to_string(),
            business_partner: "BP1".to_string(),
            exception_type: ExceptionType::Include,
            comment: None,
        };
        state.process_event(&Event::section_loaded(
            1,
            SectionData::CustomerExceptions(vec![record]),
        ));
        state.tab = Tab::Exceptions;
    }

    #[test]
    fn test_refresh_while_in_flight_issues_nothing() {
        let mut state = state();
        assert_eq!(press(&mut state, KeyCode::Char('r')), vec![Command::RefreshLive]);
        assert!(state.live_refresh_in_flight);
        assert!(press(&mut state, KeyCode::Char('r')).is_empty());
    }

    #[test]
    fn test_filter_keys_issue_filter_changed() {
        let mut state = state();
        let commands = press(&mut state, KeyCode::Char('g'));
        assert_eq!(state.filter.state().region, Some(Region::Iberia));
        assert!(matches!(
            commands.as_slice(),
            [Command::FilterChanged(query)] if query.region == Some(Region::Iberia)
        ));
    }

    #[test]
    fn test_period_keys_target_one_section() {
        let mut state = state();
        assert!(matches!(
            press(&mut state, KeyCode::Char('p')).as_slice(),
            [Command::PeriodChanged(query)] if query.period == Period::Month
        ));
        assert!(matches!(
            press(&mut state, KeyCode::Char('c')).as_slice(),
            [Command::ChartPeriodChanged(query)] if query.chart_period == Period::Month
        ));
    }

    #[test]
    fn test_filter_options_reload_on_demand() {
        let mut state = state();
        assert_eq!(
            press(&mut state, KeyCode::Char('f')),
            vec![Command::RefreshFilterOptions]
        );
    }

    #[test]
    fn test_metric_switch_fetches_nothing() {
        let mut state = state();
        assert!(press(&mut state, KeyCode::Char('m')).is_empty());
    }

    #[test]
    fn test_alert_blocks_input_until_dismissed() {
        let mut state = state();
        state.raise_alert("Save failed", "HTTP 500");
        assert!(press(&mut state, KeyCode::Char('r')).is_empty());
        assert!(!state.live_refresh_in_flight);
        press(&mut state, KeyCode::Enter);
        assert!(state.alert.is_none());
    }

    #[test]
    fn test_invalid_form_is_not_sent() {
        let mut state = state();
        state.tab = Tab::Exceptions;
        press(&mut state, KeyCode::Char('a'));
        for c in "0010".chars() {
            press(&mut state, KeyCode::Char(c));
        }
        assert!(press(&mut state, KeyCode::Enter).is_empty());
        let editor = state.editor.as_ref().unwrap();
        assert_eq!(editor.error.as_deref(), Some("House bank is required"));
        assert_eq!(editor.focus, FormField::CompanyCode);
    }

    #[test]
    fn test_edit_requests_the_record() {
        let mut state = state();
        with_exceptions(&mut state);
        assert_eq!(
            press(&mut state, KeyCode::Char('e')),
            vec![Command::OpenExceptionForEdit(11)]
        );
        assert!(state.editor.as_ref().unwrap().loading);
        press(&mut state, KeyCode::Esc);
        assert!(state.editor.is_none());
    }

    #[test]
    fn test_delete_needs_yes() {
        let mut state = state();
        with_exceptions(&mut state);
        assert!(press(&mut state, KeyCode::Char('d')).is_empty());
        assert!(press(&mut state, KeyCode::Char('n')).is_empty());
        assert!(press(&mut state, KeyCode::Char('d')).is_empty());
        assert_eq!(
            press(&mut state, KeyCode::Char('y')),
            vec![Command::DeleteException(11)]
        );
    }

    #[test]
    fn test_query_editing_filters_the_list() {
        let mut state = state();
        with_exceptions(&mut state);
        press(&mut state, KeyCode::Char('/'));
        for c in "zzz".chars() {
            press(&mut state, KeyCode::Char(c));
        }
        assert!(state.visible_exceptions().is_empty());
        press(&mut state, KeyCode::Enter);
        assert!(!state.exception_view.editing_query);
        assert_eq!(state.selected_exception_id(), None);
    }
}
