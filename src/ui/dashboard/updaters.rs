//! Dashboard state update logic
//!
//! Contains all methods for updating dashboard state from events

use super::state::{DashboardState, SectionState};

use crate::events::{Event as WorkerEvent, Payload, Section, SectionData};

impl DashboardState {
    /// Advance the animation tick and apply queued events.
    pub fn update(&mut self) {
        self.tick += 1;

        // Process all queued events one by one
        while let Some(event) = self.pending_events.pop_front() {
            self.process_event(&event);

            // Add to activity logs for display
            self.add_to_activity_log(event);
        }
    }

    /// Process a single event and update relevant state
    pub fn process_event(&mut self, event: &WorkerEvent) {
        let Some(payload) = &event.payload else {
            return;
        };

        match payload {
            Payload::SectionLoaded { ticket, data } => {
                if self.accept_ticket(data.section(), *ticket) {
                    self.apply_section(data.as_ref().clone(), &event.timestamp);
                } else {
                    log::debug!("Dropped stale {} response", data.section());
                }
            }
            Payload::SectionFailed {
                section,
                ticket,
                error,
            } => {
                if self.accept_ticket(*section, *ticket) {
                    self.fail_section(*section, error.clone());
                }
            }
            Payload::ManualRefreshStarted => self.live_refresh_in_flight = true,
            Payload::ManualRefreshFinished => self.live_refresh_in_flight = false,
            Payload::ExceptionLoaded(record) => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.load(record);
                }
            }
            Payload::ExceptionLoadFailed { id, error } => {
                if self
                    .editor
                    .as_ref()
                    .is_some_and(|editor| editor.form.id == Some(*id))
                {
                    self.editor = None;
                    self.raise_alert("Could not open exception", error.clone());
                }
            }
            Payload::ExceptionSaved { .. } => {
                self.editor = None;
            }
            Payload::ExceptionSaveFailed { error } => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.save_failed(error.clone());
                }
                self.raise_alert("Save failed", error.clone());
            }
            Payload::ExceptionDeleted(_) => {}
            Payload::ExceptionDeleteFailed { id, error } => {
                self.raise_alert(format!("Could not delete exception {}", id), error.clone());
            }
        }
    }

    fn apply_section(&mut self, data: SectionData, timestamp: &str) {
        match data {
            SectionData::FilterOptions(accounts) => {
                self.filter_options_error = None;
                self.filter.set_accounts(accounts);
            }
            SectionData::Overview(overview) => self.overview = SectionState::Ready(overview),
            SectionData::Trend(trend) => {
                self.trend = SectionState::Ready(trend);
                self.redraw_chart();
            }
            SectionData::CompanyStatus(statuses) => {
                self.company_status = SectionState::Ready(statuses);
                self.last_live_update = Some(timestamp.to_string());
            }
            SectionData::RecentTransactions(transactions) => {
                self.transactions = SectionState::Ready(transactions);
            }
            SectionData::CustomerExceptions(records) => {
                self.exceptions = SectionState::Ready(records);
                let visible = self.visible_exceptions().len();
                self.exception_view.clamp(visible);
            }
            SectionData::Insight(kind, report) => {
                self.insights.insert(kind, SectionState::Ready(report));
            }
        }
    }

    fn fail_section(&mut self, section: Section, error: String) {
        match section {
            Section::FilterOptions => self.filter_options_error = Some(error),
            Section::Overview => self.overview = SectionState::Failed(error),
            Section::Trend => {
                self.trend = SectionState::Failed(error);
                self.redraw_chart();
            }
            Section::CompanyStatus => self.company_status = SectionState::Failed(error),
            Section::RecentTransactions => self.transactions = SectionState::Failed(error),
            Section::CustomerExceptions => self.exceptions = SectionState::Failed(error),
            Section::Insight(kind) => {
                self.insights.insert(kind, SectionState::Failed(error));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{OverviewMetrics, TrendSeries};
    use crate::events::Event;
    use crate::exceptions::ExceptionEditor;
    use crate::filters::{BankAccountOption, CascadingFilter};
    use crate::logging::LogLevel;
    use crate::ui::app::UIConfig;
    use std::time::{Duration, Instant};

    fn state() -> DashboardState {
        DashboardState::new(
            CascadingFilter::default(),
            Instant::now(),
            UIConfig::new(false, "http://localhost:5000".to_string(), Duration::from_secs(300)),
        )
    }

    fn overview(total: u64) -> SectionData {
        SectionData::Overview(OverviewMetrics {
            total_payments: total,
            ..Default::default()
        })
    }

    #[test]
    fn test_stale_response_never_overwrites_newer() {
        let mut state = state();
        state.add_event(Event::section_loaded(5, overview(50)));
        state.add_event(Event::section_loaded(3, overview(30)));
        state.update();

        assert_eq!(state.overview.ready().unwrap().total_payments, 50);
        assert_eq!(state.activity_logs.len(), 2);
    }

    #[test]
    fn test_stale_failure_keeps_newer_data() {
        let mut state = state();
        state.process_event(&Event::section_loaded(4, overview(40)));
        state.process_event(&Event::section_failed(
            Section::Overview,
            2,
            "HTTP 500".to_string(),
            LogLevel::Warn,
        ));
        assert!(state.overview.ready().is_some());

        state.process_event(&Event::section_failed(
            Section::Overview,
            6,
            "HTTP 500".to_string(),
            LogLevel::Warn,
        ));
        assert_eq!(state.overview, SectionState::Failed("HTTP 500".to_string()));
    }

    #[test]
    fn test_failure_stays_in_its_section() {
        let mut state = state();
        state.process_event(&Event::section_failed(
            Section::CompanyStatus,
            1,
            "API unreachable".to_string(),
            LogLevel::Warn,
        ));
        state.process_event(&Event::section_loaded(
            2,
            SectionData::RecentTransactions(vec![]),
        ));

        assert_eq!(
            state.company_status,
            SectionState::Failed("API unreachable".to_string())
        );
        assert_eq!(state.transactions, SectionState::Ready(vec![]));
        assert_eq!(state.overview, SectionState::Loading);
    }

    #[test]
    fn test_trend_mounts_one_chart_instance() {
        let mut state = state();
        state.process_event(&Event::section_loaded(1, SectionData::Trend(TrendSeries::default())));
        state.process_event(&Event::section_loaded(2, SectionData::Trend(TrendSeries::default())));
        assert_eq!(state.canvas.live_instances(), 1);

        state.process_event(&Event::section_failed(
            Section::Trend,
            3,
            "Malformed response".to_string(),
            LogLevel::Error,
        ));
        assert_eq!(state.canvas.live_instances(), 0);
    }

    #[test]
    fn test_filter_options_feed_the_filter() {
        let mut state = state();
        let accounts = vec![BankAccountOption {
            value: "0010|HB1|EUR".to_string(),
            label: "0010 - HB1 - EUR".to_string(),
        }];
        state.process_event(&Event::section_loaded(1, SectionData::FilterOptions(accounts)));
        assert_eq!(state.filter.candidates().company_codes, vec!["0010"]);
    }

    #[test]
    fn test_save_failure_keeps_modal_open_with_alert() {
        let mut state = state();
        let mut editor = ExceptionEditor::add();
        editor.saving = true;
        state.editor = Some(editor);

        state.process_event(
            &Event::new(
                crate::events::Worker::Editor,
                "Failed to save exception".to_string(),
                crate::events::EventType::Error,
                LogLevel::Error,
            )
            .with_payload(Payload::ExceptionSaveFailed {
                error: "HTTP 400".to_string(),
            }),
        );

        let editor = state.editor.as_ref().unwrap();
        assert!(!editor.saving);
        assert_eq!(state.alert.as_ref().unwrap().title, "Save failed");
    }

    #[test]
    fn test_manual_refresh_flag_follows_events() {
        let mut state = state();
        let started = Event::new(
            crate::events::Worker::Coordinator,
            String::new(),
            crate::events::EventType::StateChange,
            LogLevel::Debug,
        );
        state.process_event(&started.clone().with_payload(Payload::ManualRefreshStarted));
        assert!(state.live_refresh_in_flight);
        state.process_event(&started.with_payload(Payload::ManualRefreshFinished));
        assert!(!state.live_refresh_in_flight);
    }
}
