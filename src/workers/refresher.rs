//! Section refresh
//!
//! Fetches one dashboard section and reports the outcome as an event. A
//! failure is reported for that section only and never stops a sibling
//! refresh.

use super::core::{EventSender, RequestSequencer};
use crate::api::DashboardApi;
use crate::api::error::ApiError;
use crate::error_classifier::ErrorClassifier;
use crate::events::{Event, Section, SectionData};
use crate::filters::FilterQuery;
use futures::future::join_all;
use std::sync::Arc;

pub struct SectionRefresher {
    api: Arc<dyn DashboardApi>,
    event_sender: EventSender,
    sequencer: RequestSequencer,
    classifier: ErrorClassifier,
}

impl SectionRefresher {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        event_sender: EventSender,
        sequencer: RequestSequencer,
    ) -> Self {
        Self {
            api,
            event_sender,
            sequencer,
            classifier: ErrorClassifier::new(),
        }
    }

    pub fn api(&self) -> &Arc<dyn DashboardApi> {
        &self.api
    }

    /// Reserve the ticket of a request that will be issued later. Reserving
    /// at dispatch time keeps ticket order equal to trigger order.
    pub fn issue(&self, section: Section) -> (Section, u64) {
        (section, self.sequencer.next_ticket())
    }

    /// Fetch one section under a fresh ticket. Returns whether it loaded.
    pub async fn refresh(&self, section: Section, query: &FilterQuery) -> bool {
        let ticket = self.sequencer.next_ticket();
        self.refresh_with_ticket(section, ticket, query).await
    }

    /// Fetch one section under a reserved ticket.
    pub async fn refresh_with_ticket(
        &self,
        section: Section,
        ticket: u64,
        query: &FilterQuery,
    ) -> bool {
        match self.fetch(section, query).await {
            Ok(data) => {
                self.event_sender
                    .send_event(Event::section_loaded(ticket, data))
                    .await;
                true
            }
            Err(e) => {
                let log_level = self.classifier.classify_fetch_error(&e);
                log::debug!("{} refresh failed: {}", section, e);
                self.event_sender
                    .send_event(Event::section_failed(section, ticket, e.summary(), log_level))
                    .await;
                false
            }
        }
    }

    /// Fire every reserved request at once. Returns how many loaded.
    pub async fn refresh_concurrently(
        &self,
        requests: &[(Section, u64)],
        query: &FilterQuery,
    ) -> usize {
        join_all(
            requests
                .iter()
                .map(|(section, ticket)| self.refresh_with_ticket(*section, *ticket, query)),
        )
        .await
        .into_iter()
        .filter(|loaded| *loaded)
        .count()
    }

    /// Company status and recent transactions, fetched together.
    pub async fn refresh_live(&self) -> (bool, bool) {
        let query = FilterQuery::default();
        tokio::join!(
            self.refresh(Section::CompanyStatus, &query),
            self.refresh(Section::RecentTransactions, &query)
        )
    }

    async fn fetch(&self, section: Section, query: &FilterQuery) -> Result<SectionData, ApiError> {
        Ok(match section {
            Section::FilterOptions => SectionData::FilterOptions(self.api.filter_options().await?),
            Section::Overview => SectionData::Overview(self.api.overview(query).await?),
            Section::Trend => SectionData::Trend(self.api.automation_trend(query).await?),
            Section::CompanyStatus => SectionData::CompanyStatus(self.api.company_status().await?),
            Section::RecentTransactions => {
                SectionData::RecentTransactions(self.api.recent_transactions().await?)
            }
            Section::CustomerExceptions => {
                SectionData::CustomerExceptions(self.api.customer_exceptions().await?)
            }
            Section::Insight(kind) => SectionData::Insight(kind, self.api.insight(kind, query).await?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDashboardApi;
    use crate::api::types::{InsightKind, OverviewMetrics, TrendSeries};
    use crate::events::{EventType, Payload};
    use crate::logging::LogLevel;
    use tokio::sync::mpsc;

    fn refresher(api: MockDashboardApi) -> (SectionRefresher, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(32);
        let refresher =
            SectionRefresher::new(Arc::new(api), EventSender::new(tx), RequestSequencer::new());
        (refresher, rx)
    }

    fn drain(rx: &mut mpsc::Receiver<Event>) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_failure_is_isolated_to_its_section() {
        let mut api = MockDashboardApi::new();
        api.expect_company_status().times(1).returning(|| {
            Err(ApiError::Http {
                status: 503,
                message: "Service Unavailable".to_string(),
            })
        });
        api.expect_recent_transactions()
            .times(1)
            .returning(|| Ok(vec![]));
        let (refresher, mut rx) = refresher(api);

        assert_eq!(refresher.refresh_live().await, (false, true));

        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        let failed = events
            .iter()
            .find(|e| e.event_type == EventType::Error)
            .unwrap();
        assert_eq!(failed.log_level, LogLevel::Warn);
        assert!(matches!(
            &failed.payload,
            Some(Payload::SectionFailed { section: Section::CompanyStatus, error, .. })
                if error == "HTTP 503: Service Unavailable"
        ));
        assert!(events.iter().any(|e| matches!(
            &e.payload,
            Some(Payload::SectionLoaded { data, .. })
                if data.section() == Section::RecentTransactions
        )));
    }

    #[tokio::test]
    async fn test_tickets_follow_issue_order() {
        let mut api = MockDashboardApi::new();
        api.expect_overview()
            .returning(|_| Ok(OverviewMetrics::default()));
        api.expect_automation_trend()
            .returning(|_| Ok(TrendSeries::default()));
        let (refresher, mut rx) = refresher(api);
        let query = FilterQuery::default();

        refresher.refresh(Section::Overview, &query).await;
        refresher.refresh(Section::Trend, &query).await;

        let tickets: Vec<u64> = drain(&mut rx)
            .into_iter()
            .filter_map(|e| match e.payload {
                Some(Payload::SectionLoaded { ticket, .. }) => Some(ticket),
                _ => None,
            })
            .collect();
        assert_eq!(tickets, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_reserved_ticket_is_kept_when_issued_late() {
        let mut api = MockDashboardApi::new();
        api.expect_automation_trend()
            .returning(|_| Ok(TrendSeries::default()));
        let (refresher, mut rx) = refresher(api);
        let query = FilterQuery::default();

        let (section, early) = refresher.issue(Section::Trend);
        refresher.refresh(Section::Trend, &query).await;
        refresher.refresh_with_ticket(section, early, &query).await;

        let tickets: Vec<u64> = drain(&mut rx)
            .into_iter()
            .filter_map(|e| match e.payload {
                Some(Payload::SectionLoaded { ticket, .. }) => Some(ticket),
                _ => None,
            })
            .collect();
        assert_eq!(tickets, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_insights_load_independently() {
        let mut api = MockDashboardApi::new();
        api.expect_insight().returning(|kind, _| match kind {
            InsightKind::Summary => Err(ApiError::Http {
                status: 500,
                message: String::new(),
            }),
            _ => Ok(Default::default()),
        });
        let (refresher, _rx) = refresher(api);
        let requests: Vec<(Section, u64)> = InsightKind::ALL
            .into_iter()
            .map(|kind| refresher.issue(Section::Insight(kind)))
            .collect();

        let loaded = refresher
            .refresh_concurrently(&requests, &FilterQuery::default())
            .await;
        assert_eq!(loaded, InsightKind::ALL.len() - 1);
    }
}
