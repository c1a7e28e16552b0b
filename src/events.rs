//! Event System
//!
//! Types and implementations for worker events and logging

use crate::api::types::{
    CompanyStatus, CustomerException, InsightKind, InsightReport, OverviewMetrics, Transaction,
    TrendSeries,
};
use crate::filters::BankAccountOption;
use crate::logging::{LogLevel, should_log_with_env};
use chrono::Local;
use std::fmt::Display;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Worker {
    /// Worker that turns UI commands into fetches.
    Coordinator,
    /// Fetches one dashboard section.
    Refresher,
    /// Background timer refreshing the live sections.
    LivePoller,
    /// Saves and deletes customer exceptions.
    Editor,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    Refresh,
    StateChange,
}

/// Independently loaded part of the dashboard.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Section {
    FilterOptions,
    Overview,
    Trend,
    CompanyStatus,
    RecentTransactions,
    CustomerExceptions,
    Insight(InsightKind),
}

impl Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::FilterOptions => write!(f, "filter options"),
            Section::Overview => write!(f, "overview"),
            Section::Trend => write!(f, "automation trend"),
            Section::CompanyStatus => write!(f, "company status"),
            Section::RecentTransactions => write!(f, "recent transactions"),
            Section::CustomerExceptions => write!(f, "customer exceptions"),
            Section::Insight(kind) => write!(f, "{}", kind.title().to_lowercase()),
        }
    }
}

/// A successfully fetched section payload.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionData {
    FilterOptions(Vec<BankAccountOption>),
    Overview(OverviewMetrics),
    Trend(TrendSeries),
    CompanyStatus(Vec<CompanyStatus>),
    RecentTransactions(Vec<Transaction>),
    CustomerExceptions(Vec<CustomerException>),
    Insight(InsightKind, InsightReport),
}

impl SectionData {
    pub fn section(&self) -> Section {
        match self {
            SectionData::FilterOptions(_) => Section::FilterOptions,
            SectionData::Overview(_) => Section::Overview,
            SectionData::Trend(_) => Section::Trend,
            SectionData::CompanyStatus(_) => Section::CompanyStatus,
            SectionData::RecentTransactions(_) => Section::RecentTransactions,
            SectionData::CustomerExceptions(_) => Section::CustomerExceptions,
            SectionData::Insight(kind, _) => Section::Insight(*kind),
        }
    }
}

/// State carried by an event for the UI to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    SectionLoaded {
        ticket: u64,
        data: Box<SectionData>,
    },
    SectionFailed {
        section: Section,
        ticket: u64,
        error: String,
    },
    ManualRefreshStarted,
    /// Both live sections answered, successfully or not.
    ManualRefreshFinished,
    ExceptionLoaded(CustomerException),
    ExceptionLoadFailed {
        id: i64,
        error: String,
    },
    ExceptionSaved {
        id: Option<i64>,
    },
    ExceptionSaveFailed {
        error: String,
    },
    ExceptionDeleted(i64),
    ExceptionDeleteFailed {
        id: i64,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub worker: Worker,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
    /// State for the dashboard to apply, if any
    pub payload: Option<Payload>,
}

impl Event {
    pub fn new(worker: Worker, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            worker,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn section_loaded(ticket: u64, data: SectionData) -> Self {
        let msg = format!("Loaded {}", data.section());
        Self::new(Worker::Refresher, msg, EventType::Success, LogLevel::Debug).with_payload(
            Payload::SectionLoaded {
                ticket,
                data: Box::new(data),
            },
        )
    }

    pub fn section_failed(
        section: Section,
        ticket: u64,
        error: String,
        log_level: LogLevel,
    ) -> Self {
        let msg = format!("Failed to load {}: {}", section, error);
        Self::new(Worker::Refresher, msg, EventType::Error, log_level).with_payload(
            Payload::SectionFailed {
                section,
                ticket,
                error,
            },
        )
    }

    pub fn should_display(&self) -> bool {
        // Always show errors and info level events
        if self.event_type == EventType::Error || self.log_level >= LogLevel::Info {
            return true;
        }
        // StateChange events drive the UI and are not logged
        if self.event_type == EventType::StateChange {
            return false;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.event_type, self.timestamp, self.msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_failed_keeps_error_for_placeholder() {
        let event = Event::section_failed(
            Section::Trend,
            3,
            "HTTP 500: boom".to_string(),
            LogLevel::Warn,
        );
        assert_eq!(event.msg, "Failed to load automation trend: HTTP 500: boom");
        assert!(event.should_display());
        assert_eq!(
            event.payload,
            Some(Payload::SectionFailed {
                section: Section::Trend,
                ticket: 3,
                error: "HTTP 500: boom".to_string(),
            })
        );
    }

    #[test]
    fn test_state_change_events_are_not_logged() {
        let event = Event::new(
            Worker::Coordinator,
            "refresh started".to_string(),
            EventType::StateChange,
            LogLevel::Debug,
        );
        assert!(!event.should_display());
    }

    #[test]
    fn test_section_data_reports_its_section() {
        let data = SectionData::Insight(InsightKind::Summary, InsightReport::default());
        assert_eq!(data.section(), Section::Insight(InsightKind::Summary));
        assert_eq!(data.section().to_string(), "summary");
    }
}
