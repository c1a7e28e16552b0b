//! Core worker utilities

use crate::events::{Event, EventType, Payload, Worker};
use crate::logging::LogLevel;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

/// Common event sending utilities for workers
#[derive(Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Send a generic event
    pub async fn send_event(&self, event: Event) {
        let _ = self.sender.send(event).await;
    }

    pub async fn send_worker_event(
        &self,
        worker: Worker,
        message: String,
        event_type: EventType,
        log_level: LogLevel,
    ) {
        self.send_event(Event::new(worker, message, event_type, log_level))
            .await;
    }

    /// State change for the UI, not shown in the activity log.
    pub async fn send_state(&self, worker: Worker, message: String, payload: Payload) {
        self.send_event(
            Event::new(worker, message, EventType::StateChange, LogLevel::Debug)
                .with_payload(payload),
        )
        .await;
    }
}

/// Hands out increasing tickets so the UI can drop responses that were
/// overtaken by a newer request for the same section.
#[derive(Clone, Debug, Default)]
pub struct RequestSequencer {
    next: Arc<AtomicU64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tickets start at 1 so 0 can mean "nothing applied yet".
    pub fn next_ticket(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst) + 1
    }
}
