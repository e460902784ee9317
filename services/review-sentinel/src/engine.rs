//! Poll loop: fetch, validate, detect, notify, and recover from failures

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::detector::{Detection, StatusChangeDetector};
use crate::notifier::{
    truncate_chars, NotificationKind, NotificationRecord, NotificationSink, MAX_MESSAGE_CHARS,
};
use crate::state::{CycleOutcome, FailureState};
use crate::status::{Cursor, StatusFetcher, StatusItem};
use crate::validator::validate_response;

/// Prefix of the alert sent when a failure streak starts
pub const FAILURE_MESSAGE_PREFIX: &str = "Сбой в работе программы";

/// Owns the cursor, the last seen item and the failure state, and drives
/// one cycle per interval until cancelled.
#[derive(Debug)]
pub struct PollLoop {
    fetcher: Arc<dyn StatusFetcher>,
    sink: Arc<dyn NotificationSink>,
    detector: StatusChangeDetector,
    cursor: Cursor,
    failure: FailureState,
    interval: Duration,
    cancel: CancellationToken,
}

impl PollLoop {
    pub fn new(
        fetcher: Arc<dyn StatusFetcher>,
        sink: Arc<dyn NotificationSink>,
        start: Cursor,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            fetcher,
            sink,
            detector: StatusChangeDetector::new(),
            cursor: start,
            failure: FailureState::Clear,
            interval,
            cancel,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn failure_state(&self) -> FailureState {
        self.failure
    }

    pub fn last_seen(&self) -> Option<&StatusItem> {
        self.detector.last_seen()
    }

    /// Run cycles until the cancellation token is triggered
    pub async fn run(&mut self) {
        tracing::info!(
            "Poll loop started (interval: {:?}, cursor: {}, sink: {})",
            self.interval,
            self.cursor,
            self.sink.type_name()
        );

        loop {
            let outcome = self.tick().await;
            tracing::debug!("Cycle finished: success={}", outcome.is_success());

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Poll loop cancelled");
                    break;
                }
            }
        }

        tracing::info!("Poll loop stopped");
    }

    /// Run exactly one cycle, including failure handling, without sleeping
    pub async fn tick(&mut self) -> CycleOutcome {
        match self.run_cycle().await {
            Ok(record) => {
                if self.failure == FailureState::Alerted {
                    tracing::info!("Recovered after failure streak");
                }
                self.failure.clear();
                match record {
                    Some(record) => CycleOutcome::Notified(record),
                    None => CycleOutcome::Unchanged,
                }
            }
            Err(e) => self.handle_failure(e).await,
        }
    }

    async fn run_cycle(&mut self) -> crate::Result<Option<NotificationRecord>> {
        let response = self.fetcher.fetch(self.cursor).await?;
        let validated = validate_response(&response)?;
        let next_cursor = validated.current_date;

        let record = match self.detector.detect(validated.homeworks)? {
            Detection::NoChange => None,
            Detection::Changed { message, .. } => {
                self.sink.send(&message).await?;
                Some(NotificationRecord {
                    kind: NotificationKind::StatusChange,
                    message,
                    success: true,
                    error: None,
                })
            }
        };

        tracing::debug!("Cursor advanced {} -> {}", self.cursor, next_cursor);
        self.cursor = next_cursor;
        Ok(record)
    }

    async fn handle_failure(&mut self, error: crate::ReviewError) -> CycleOutcome {
        tracing::error!("Poll cycle failed: {}", error);
        let error = error.to_string();

        if !self.failure.begin_alert() {
            tracing::debug!("Failure alert already sent for this streak; suppressing");
            return CycleOutcome::Failed { error, alert: None };
        }

        let message = truncate_chars(
            &format!("{}: {}", FAILURE_MESSAGE_PREFIX, error),
            MAX_MESSAGE_CHARS,
        );
        let result = self.sink.send(&message).await;
        if let Err(e) = &result {
            tracing::warn!(
                "Failure alert via '{}' could not be delivered: {}",
                self.sink.type_name(),
                e
            );
        }

        let record = NotificationRecord {
            kind: NotificationKind::FailureAlert,
            message,
            success: result.is_ok(),
            error: result.err().map(|e| e.to_string()),
        };

        CycleOutcome::Failed {
            error,
            alert: Some(record),
        }
    }
}
