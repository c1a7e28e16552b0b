//! Refresh coordination
//!
//! Turns UI commands into section refreshes. Each command runs on its own
//! task so a slow request never holds up the next trigger; the UI drops
//! responses that were overtaken using the request tickets.

use super::core::EventSender;
use super::editor::ExceptionWorker;
use super::poller::LivePoller;
use super::refresher::SectionRefresher;
use crate::api::types::{ExceptionPayload, InsightKind};
use crate::events::{Payload, Section, Worker};
use crate::filters::FilterQuery;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Sections fetched when the dashboard opens.
const INITIAL_SECTIONS: [Section; 6] = [
    Section::FilterOptions,
    Section::Overview,
    Section::Trend,
    Section::CompanyStatus,
    Section::RecentTransactions,
    Section::CustomerExceptions,
];

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Load every section and start the live poller.
    Initialize(FilterQuery),
    /// Region, company code or bank account changed.
    FilterChanged(FilterQuery),
    PeriodChanged(FilterQuery),
    ChartPeriodChanged(FilterQuery),
    /// Manual refresh of the live sections.
    RefreshLive,
    RefreshExceptions,
    /// Reload the bank-account list behind the filter dropdowns.
    RefreshFilterOptions,
    RefreshInsights(FilterQuery),
    OpenExceptionForEdit(i64),
    SaveException {
        id: Option<i64>,
        payload: ExceptionPayload,
    },
    DeleteException(i64),
}

pub struct Coordinator {
    refresher: Arc<SectionRefresher>,
    editor: Arc<ExceptionWorker>,
    poller: LivePoller,
    event_sender: EventSender,
}

impl Coordinator {
    pub fn new(
        refresher: Arc<SectionRefresher>,
        event_sender: EventSender,
        poller: LivePoller,
    ) -> Self {
        let editor = Arc::new(ExceptionWorker::new(
            refresher.clone(),
            event_sender.clone(),
        ));
        Self {
            refresher,
            editor,
            poller,
            event_sender,
        }
    }

    /// Process commands until shutdown or until every command sender is gone.
    pub fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.recv() => break,
                    command = commands.recv() => match command {
                        Some(command) => {
                            self.dispatch(command);
                        }
                        None => break,
                    }
                }
            }
            self.poller.stop();
        })
    }

    /// Spawn the work for one command. Tickets for every section the command
    /// touches are reserved here, before the task starts, so a later trigger
    /// always outranks an earlier one however slowly the earlier one runs.
    pub fn dispatch(&mut self, command: Command) -> JoinHandle<()> {
        log::debug!("Dispatching {:?}", command);
        if matches!(command, Command::Initialize(_)) && self.poller.ensure_started() {
            log::debug!("Live poller started");
        }

        let requests: Vec<(Section, u64)> = sections_for(&command)
            .into_iter()
            .map(|section| self.refresher.issue(section))
            .collect();
        let refresher = self.refresher.clone();
        let editor = self.editor.clone();
        let event_sender = self.event_sender.clone();
        tokio::spawn(async move {
            match command {
                Command::FilterChanged(query) => {
                    // Sequential: the trend request is issued after the overview answered
                    for (section, ticket) in requests {
                        refresher.refresh_with_ticket(section, ticket, &query).await;
                    }
                }
                Command::Initialize(query)
                | Command::PeriodChanged(query)
                | Command::ChartPeriodChanged(query)
                | Command::RefreshInsights(query) => {
                    refresher.refresh_concurrently(&requests, &query).await;
                }
                Command::RefreshLive => {
                    event_sender
                        .send_state(
                            Worker::Coordinator,
                            "Refreshing live data".to_string(),
                            Payload::ManualRefreshStarted,
                        )
                        .await;
                    refresher
                        .refresh_concurrently(&requests, &FilterQuery::default())
                        .await;
                    event_sender
                        .send_state(
                            Worker::Coordinator,
                            "Live data refresh finished".to_string(),
                            Payload::ManualRefreshFinished,
                        )
                        .await;
                }
                Command::RefreshExceptions | Command::RefreshFilterOptions => {
                    refresher
                        .refresh_concurrently(&requests, &FilterQuery::default())
                        .await;
                }
                Command::OpenExceptionForEdit(id) => editor.load_for_edit(id).await,
                Command::SaveException { id, payload } => editor.save(id, &payload).await,
                Command::DeleteException(id) => editor.delete(id).await,
            }
        })
    }
}

/// Sections a command refreshes, in request order.
fn sections_for(command: &Command) -> Vec<Section> {
    let insights = || InsightKind::ALL.into_iter().map(Section::Insight);
    match command {
        Command::Initialize(_) => INITIAL_SECTIONS.into_iter().chain(insights()).collect(),
        Command::FilterChanged(_) => vec![Section::Overview, Section::Trend],
        Command::PeriodChanged(_) => vec![Section::Overview],
        Command::ChartPeriodChanged(_) => vec![Section::Trend],
        Command::RefreshLive => vec![Section::CompanyStatus, Section::RecentTransactions],
        Command::RefreshExceptions => vec![Section::CustomerExceptions],
        Command::RefreshFilterOptions => vec![Section::FilterOptions],
        Command::RefreshInsights(_) => insights().collect(),
        // Mutations reload the list under their own ticket once they succeed
        Command::OpenExceptionForEdit(_)
        | Command::SaveException { .. }
        | Command::DeleteException(_) => Vec::new(),
    }
}
