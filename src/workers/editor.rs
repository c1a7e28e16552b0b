//! Customer exception mutations
//!
//! Loads the record to edit, saves and deletes. Every outcome is reported as
//! an event; a successful mutation also reloads the exception list.

use super::core::EventSender;
use super::refresher::SectionRefresher;
use crate::api::types::ExceptionPayload;
use crate::error_classifier::ErrorClassifier;
use crate::events::{Event, EventType, Payload, Section, Worker};
use crate::filters::FilterQuery;
use crate::logging::LogLevel;
use std::sync::Arc;

pub struct ExceptionWorker {
    refresher: Arc<SectionRefresher>,
    event_sender: EventSender,
    classifier: ErrorClassifier,
}

impl ExceptionWorker {
    pub fn new(refresher: Arc<SectionRefresher>, event_sender: EventSender) -> Self {
        Self {
            refresher,
            event_sender,
            classifier: ErrorClassifier::new(),
        }
    }

    /// Fetch the list and hand the record with `id` to the open editor.
    pub async fn load_for_edit(&self, id: i64) {
        let result = self.refresher.api().customer_exceptions().await;
        let event = match result {
            Ok(records) => match records.into_iter().find(|r| r.id == id) {
                Some(record) => Event::new(
                    Worker::Editor,
                    format!("Loaded exception {}", id),
                    EventType::Success,
                    LogLevel::Debug,
                )
                .with_payload(Payload::ExceptionLoaded(record)),
                None => self.load_failed(id, format!("Exception {} not found", id), LogLevel::Warn),
            },
            Err(e) => {
                let level = self.classifier.classify_fetch_error(&e);
                self.load_failed(id, e.summary(), level)
            }
        };
        self.event_sender.send_event(event).await;
    }

    fn load_failed(&self, id: i64, error: String, level: LogLevel) -> Event {
        Event::new(
            Worker::Editor,
            format!("Failed to load exception {}: {}", id, error),
            EventType::Error,
            level,
        )
        .with_payload(Payload::ExceptionLoadFailed { id, error })
    }

    /// Create when `id` is `None`, update otherwise.
    pub async fn save(&self, id: Option<i64>, payload: &ExceptionPayload) {
        let api = self.refresher.api();
        let result = match id {
            Some(id) => api.update_customer_exception(id, payload).await,
            None => api.create_customer_exception(payload).await,
        };

        match result {
            Ok(()) => {
                let msg = match id {
                    Some(id) => format!("Updated exception {}", id),
                    None => format!(
                        "Created exception for {} on {}",
                        payload.business_partner, payload.company_code
                    ),
                };
                self.event_sender
                    .send_event(
                        Event::new(Worker::Editor, msg, EventType::Success, LogLevel::Info)
                            .with_payload(Payload::ExceptionSaved { id }),
                    )
                    .await;
                self.reload_list().await;
            }
            Err(e) => {
                let error = e.to_string();
                self.event_sender
                    .send_event(
                        Event::new(
                            Worker::Editor,
                            format!("Failed to save exception: {}", error),
                            EventType::Error,
                            self.classifier.classify_mutation_error(&e),
                        )
                        .with_payload(Payload::ExceptionSaveFailed { error }),
                    )
                    .await;
            }
        }
    }

    pub async fn delete(&self, id: i64) {
        match self.refresher.api().delete_customer_exception(id).await {
            Ok(()) => {
                self.event_sender
                    .send_event(
                        Event::new(
                            Worker::Editor,
                            format!("Deleted exception {}", id),
                            EventType::Success,
                            LogLevel::Info,
                        )
                        .with_payload(Payload::ExceptionDeleted(id)),
                    )
                    .await;
                self.reload_list().await;
            }
            Err(e) => {
                let error = e.to_string();
                self.event_sender
                    .send_event(
                        Event::new(
                            Worker::Editor,
                            format!("Failed to delete exception {}: {}", id, error),
                            EventType::Error,
                            self.classifier.classify_mutation_error(&e),
                        )
                        .with_payload(Payload::ExceptionDeleteFailed { id, error }),
                    )
                    .await;
            }
        }
    }

    async fn reload_list(&self) {
        self.refresher
            .refresh(Section::CustomerExceptions, &FilterQuery::default())
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDashboardApi;
    use crate::api::error::ApiError;
    use crate::api::types::{CustomerException, ExceptionType};
    use crate::workers::core::RequestSequencer;
    use tokio::sync::mpsc;

    fn payload() -> ExceptionPayload {
        ExceptionPayload {
            company_code: "0010".to_string(),
            housebank: "1050D".to_string(),
            currency: "EUR".to_string(),
            business_partner: "BP1".to_string(),
            exception_type: ExceptionType::Include,
            comment: None,
        }
    }

    fn worker(api: MockDashboardApi) -> (ExceptionWorker, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(16);
        let sender = EventSender::new(tx);
        let refresher = Arc::new(SectionRefresher::new(
            Arc::new(api),
            sender.clone(),
            RequestSequencer::new(),
        ));
        (ExceptionWorker::new(refresher, sender), rx)
    }

    #[tokio::test]
    async fn test_create_then_reload_list() {
        let mut api = MockDashboardApi::new();
        api.expect_create_customer_exception()
            .times(1)
            .returning(|_| Ok(()));
        api.expect_update_customer_exception().never();
        api.expect_customer_exceptions()
            .times(1)
            .returning(|| Ok(vec![]));
        let (worker, mut rx) = worker(api);

        worker.save(None, &payload()).await;

        let saved = rx.recv().await.unwrap();
        assert_eq!(saved.payload, Some(Payload::ExceptionSaved { id: None }));
        let reloaded = rx.recv().await.unwrap();
        assert!(matches!(
            reloaded.payload,
            Some(Payload::SectionLoaded { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_failure_keeps_list() {
        let mut api = MockDashboardApi::new();
        api.expect_update_customer_exception()
            .withf(|id, _| *id == 9)
            .times(1)
            .returning(|_, _| {
                Err(ApiError::Http {
                    status: 400,
                    message: "Duplicate exception".to_string(),
                })
            });
        api.expect_customer_exceptions().never();
        let (worker, mut rx) = worker(api);

        worker.save(Some(9), &payload()).await;

        let failed = rx.recv().await.unwrap();
        assert_eq!(failed.log_level, LogLevel::Error);
        assert_eq!(
            failed.payload,
            Some(Payload::ExceptionSaveFailed {
                error: "HTTP error with status 400: Duplicate exception".to_string()
            })
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_load_for_edit_matches_by_id() {
        let mut api = MockDashboardApi::new();
        api.expect_customer_exceptions().returning(|| {
            Ok(vec![CustomerException {
                id: 3,
                company_code: "0010".to_string(),
                housebank: "1050D".to_string(),
                currency: "EUR".to_string(),
                business_partner: "BP1".to_string(),
                exception_type: ExceptionType::Include,
                comment: None,
            }])
        });
        let (worker, mut rx) = worker(api);

        worker.load_for_edit(3).await;
        assert!(matches!(
            rx.recv().await.unwrap().payload,
            Some(Payload::ExceptionLoaded(record)) if record.id == 3
        ));

        worker.load_for_edit(4).await;
        assert_eq!(
            rx.recv().await.unwrap().payload,
            Some(Payload::ExceptionLoadFailed {
                id: 4,
                error: "Exception 4 not found".to_string()
            })
        );
    }
}
