//! Dashboard state management
//!
//! Contains the main dashboard state struct and related enums

use crate::api::types::{
    CompanyStatus, CustomerException, InsightKind, InsightReport, OverviewMetrics, Transaction,
    TrendSeries,
};
use crate::chart::{ChartCanvas, TrendChart};
use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
use crate::events::{Event as WorkerEvent, Section};
use crate::exceptions::{ExceptionEditor, ExceptionListView, filter_exceptions};
use crate::filters::CascadingFilter;
use crate::ui::app::UIConfig;

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

/// Load state of one dashboard section.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionState<T> {
    Loading,
    Ready(T),
    /// Inline placeholder text
    Failed(String),
}

impl<T> SectionState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            SectionState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Tab {
    Overview,
    Live,
    Exceptions,
    Insights,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Live, Tab::Exceptions, Tab::Insights];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Blocking message; swallows input until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

/// Dashboard view state, owned by the UI loop.
#[derive(Debug)]
pub struct DashboardState {
    /// API the workers talk to.
    pub api_url: String,
    /// Interval of the background live refresh.
    pub live_interval: Duration,
    /// The start time of the application, used for computing uptime.
    pub start_time: Instant,
    /// Whether to enable background colors
    pub with_background_color: bool,
    /// Animation tick counter
    pub tick: usize,
    pub tab: Tab,

    pub filter: CascadingFilter,
    /// Set when `/api/filter-options` failed; the dropdowns stay empty.
    pub filter_options_error: Option<String>,

    pub overview: SectionState<OverviewMetrics>,
    pub trend: SectionState<TrendSeries>,
    pub company_status: SectionState<Vec<CompanyStatus>>,
    pub transactions: SectionState<Vec<Transaction>>,
    pub exceptions: SectionState<Vec<CustomerException>>,
    pub insights: HashMap<InsightKind, SectionState<InsightReport>>,

    pub canvas: ChartCanvas,
    /// Open add/edit modal
    pub editor: Option<ExceptionEditor>,
    pub exception_view: ExceptionListView,

    /// Manual refresh running; the trigger is disabled meanwhile.
    pub live_refresh_in_flight: bool,
    /// Timestamp of the last company-status answer
    pub last_live_update: Option<String>,
    pub alert: Option<Alert>,

    /// Queue of events waiting to be processed
    pub pending_events: VecDeque<WorkerEvent>,
    /// Activity logs for display
    pub activity_logs: VecDeque<WorkerEvent>,

    /// Newest ticket applied per section
    applied_tickets: HashMap<Section, u64>,
}

impl DashboardState {
    /// Creates a new instance of the dashboard state.
    pub fn new(filter: CascadingFilter, start_time: Instant, ui_config: UIConfig) -> Self {
        Self {
            api_url: ui_config.api_url,
            live_interval: ui_config.live_interval,
            start_time,
            with_background_color: ui_config.with_background_color,
            tick: 0,
            tab: Tab::Overview,
            filter,
            filter_options_error: None,
            overview: SectionState::Loading,
            trend: SectionState::Loading,
            company_status: SectionState::Loading,
            transactions: SectionState::Loading,
            exceptions: SectionState::Loading,
            insights: InsightKind::ALL
                .into_iter()
                .map(|kind| (kind, SectionState::Loading))
                .collect(),
            canvas: ChartCanvas::new(),
            editor: None,
            exception_view: ExceptionListView::default(),
            live_refresh_in_flight: false,
            last_live_update: None,
            alert: None,
            pending_events: VecDeque::new(),
            activity_logs: VecDeque::new(),
            applied_tickets: HashMap::new(),
        }
    }

    /// Add an event to activity logs with size limit
    pub fn add_to_activity_log(&mut self, event: WorkerEvent) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    /// Add an event to the processing queue
    pub fn add_event(&mut self, event: WorkerEvent) {
        self.pending_events.push_back(event);
    }

    /// Record `ticket` for `section` unless a newer one was already applied.
    pub fn accept_ticket(&mut self, section: Section, ticket: u64) -> bool {
        let applied = self.applied_tickets.entry(section).or_insert(0);
        if ticket <= *applied {
            return false;
        }
        *applied = ticket;
        true
    }

    /// Redraw the trend chart from the held series with the current metric.
    pub fn redraw_chart(&mut self) {
        match &self.trend {
            SectionState::Ready(trend) => {
                let chart = TrendChart::build(self.filter.state().chart_metric, trend);
                self.canvas.mount(chart);
            }
            _ => self.canvas.release(),
        }
    }

    /// Company-status cards passing the region and company-code filters.
    pub fn visible_company_status(&self) -> Vec<&CompanyStatus> {
        self.company_status
            .ready()
            .map(|statuses| {
                statuses
                    .iter()
                    .filter(|s| self.filter.matches_company(&s.company_code))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Exceptions passing the list filter.
    pub fn visible_exceptions(&self) -> Vec<&CustomerException> {
        self.exceptions
            .ready()
            .map(|records| filter_exceptions(records, &self.exception_view.query))
            .unwrap_or_default()
    }

    pub fn selected_exception_id(&self) -> Option<i64> {
        self.visible_exceptions()
            .get(self.exception_view.selected)
            .map(|record| record.id)
    }

    /// Whether keys go to an overlay or text field instead of the shortcuts.
    pub fn captures_input(&self) -> bool {
        self.alert.is_some()
            || self.editor.is_some()
            || self.exception_view.pending_delete.is_some()
            || self.exception_view.editing_query
    }

    pub fn raise_alert(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.alert = Some(Alert {
            title: title.into(),
            message: message.into(),
        });
    }
}
