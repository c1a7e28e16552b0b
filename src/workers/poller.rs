//! Background refresh of the live sections

use super::core::EventSender;
use super::refresher::SectionRefresher;
use crate::events::{EventType, Worker};
use crate::logging::LogLevel;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Re-fetches company status and recent transactions on a fixed interval.
/// Starting it again while it runs is a no-op.
pub struct LivePoller {
    interval: Duration,
    refresher: Arc<SectionRefresher>,
    event_sender: EventSender,
    shutdown: broadcast::Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl LivePoller {
    pub fn new(
        interval: Duration,
        refresher: Arc<SectionRefresher>,
        event_sender: EventSender,
        shutdown: broadcast::Sender<()>,
    ) -> Self {
        Self {
            interval,
            refresher,
            event_sender,
            shutdown,
            handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Start the timer unless it is already running. Returns whether a new
    /// timer was started. The first tick fires one interval from now.
    pub fn ensure_started(&mut self) -> bool {
        if self.is_running() {
            return false;
        }

        let period = self.interval;
        let refresher = self.refresher.clone();
        let event_sender = self.event_sender.clone();
        let mut shutdown = self.shutdown.subscribe();
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = shutdown.recv() => break,
                    _ = ticker.tick() => {
                        log::debug!("Live poll tick");
                        event_sender
                            .send_worker_event(
                                Worker::LivePoller,
                                "Refreshing company status and recent transactions".to_string(),
                                EventType::Refresh,
                                LogLevel::Info,
                            )
                            .await;
                        refresher.refresh_live().await;
                    }
                }
            }
        }));
        true
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for LivePoller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDashboardApi;
    use crate::events::{Event, Payload, Section};
    use crate::workers::core::{EventSender, RequestSequencer};
    use tokio::sync::mpsc;

    fn live_loads(rx: &mut mpsc::Receiver<Event>) -> usize {
        let mut count = 0;
        while let Ok(event) = rx.try_recv() {
            if let Some(Payload::SectionLoaded { data, .. }) = &event.payload {
                if data.section() == Section::CompanyStatus {
                    count += 1;
                }
            }
        }
        count
    }

    fn poll_notices(rx: &mut mpsc::Receiver<Event>) -> Vec<Event> {
        let mut notices = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if event.worker == Worker::LivePoller {
                notices.push(event);
            }
        }
        notices
    }

    fn poller(interval: Duration) -> (LivePoller, mpsc::Receiver<Event>, broadcast::Sender<()>) {
        let mut api = MockDashboardApi::new();
        api.expect_company_status().returning(|| Ok(vec![]));
        api.expect_recent_transactions().returning(|| Ok(vec![]));
        let (tx, rx) = mpsc::channel(64);
        let sender = EventSender::new(tx);
        let refresher = Arc::new(SectionRefresher::new(
            Arc::new(api),
            sender.clone(),
            RequestSequencer::new(),
        ));
        let (shutdown, _) = broadcast::channel(1);
        (
            LivePoller::new(interval, refresher, sender, shutdown.clone()),
            rx,
            shutdown,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_started_twice_ticks_once_per_interval() {
        let (mut poller, mut rx, _shutdown) = poller(Duration::from_secs(300));
        assert!(poller.ensure_started());
        assert!(!poller.ensure_started());

        tokio::time::sleep(Duration::from_secs(299)).await;
        assert_eq!(live_loads(&mut rx), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(live_loads(&mut rx), 1);

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(live_loads(&mut rx), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_the_timer() {
        let (mut poller, mut rx, shutdown) = poller(Duration::from_secs(30));
        poller.ensure_started();
        tokio::task::yield_now().await;
        shutdown.send(()).unwrap();

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(live_loads(&mut rx), 0);
        assert!(!poller.is_running());
        assert!(poller.ensure_started());
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_tick_is_announced_in_the_activity_log() {
        let (mut poller, mut rx, _shutdown) = poller(Duration::from_secs(30));
        poller.ensure_started();

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert!(poll_notices(&mut rx).is_empty());

        tokio::time::sleep(Duration::from_secs(2)).await;
        let notices = poll_notices(&mut rx);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].event_type, EventType::Refresh);
        assert!(notices[0].should_display());
    }
}
