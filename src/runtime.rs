//! Runtime for the dashboard workers

use crate::api::DashboardApi;
use crate::events::Event;
use crate::workers::core::{EventSender, RequestSequencer};
use crate::workers::poller::LivePoller;
use crate::workers::refresher::SectionRefresher;
use crate::workers::{Command, Coordinator};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Channels and tasks of a running worker set.
pub struct WorkerHandles {
    pub event_receiver: mpsc::Receiver<Event>,
    pub command_sender: mpsc::Sender<Command>,
    pub join_handles: Vec<JoinHandle<()>>,
}

/// Start the refresh coordinator. The live poller is armed by the first
/// `Command::Initialize`.
pub fn start_dashboard_workers(
    api: Arc<dyn DashboardApi>,
    live_interval: Duration,
    shutdown_sender: &broadcast::Sender<()>,
) -> WorkerHandles {
    let (event_sender, event_receiver) =
        mpsc::channel::<Event>(crate::consts::cli_consts::EVENT_QUEUE_SIZE);
    let (command_sender, command_receiver) =
        mpsc::channel::<Command>(crate::consts::cli_consts::COMMAND_QUEUE_SIZE);

    let event_sender = EventSender::new(event_sender);
    let refresher = Arc::new(SectionRefresher::new(
        api,
        event_sender.clone(),
        RequestSequencer::new(),
    ));
    let poller = LivePoller::new(
        live_interval,
        refresher.clone(),
        event_sender.clone(),
        shutdown_sender.clone(),
    );
    let coordinator = Coordinator::new(refresher, event_sender, poller);

    let handle = coordinator.run(command_receiver, shutdown_sender.subscribe());

    WorkerHandles {
        event_receiver,
        command_sender,
        join_handles: vec![handle],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDashboardApi;
    use crate::api::types::OverviewMetrics;
    use crate::events::{Payload, Section};
    use crate::filters::FilterQuery;

    #[tokio::test]
    async fn test_commands_reach_the_api_and_shutdown_stops_workers() {
        let mut api = MockDashboardApi::new();
        api.expect_overview()
            .times(1)
            .returning(|_| Ok(OverviewMetrics::default()));
        let (shutdown, _) = broadcast::channel(1);
        let mut handles =
            start_dashboard_workers(Arc::new(api), Duration::from_secs(300), &shutdown);

        handles
            .command_sender
            .send(Command::PeriodChanged(FilterQuery::default()))
            .await
            .unwrap();
        let event = handles.event_receiver.recv().await.unwrap();
        assert!(matches!(
            event.payload,
            Some(Payload::SectionLoaded { data, .. }) if data.section() == Section::Overview
        ));

        shutdown.send(()).unwrap();
        for handle in handles.join_handles {
            handle.await.unwrap();
        }
    }
}
