//! Failure tracking and per-cycle outcomes

use crate::notifier::NotificationRecord;

/// Whether the current failure streak has already been reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureState {
    #[default]
    Clear,
    Alerted,
}

impl FailureState {
    /// Claim the one alert allowed per streak. Returns true if the caller
    /// should send it.
    pub fn begin_alert(&mut self) -> bool {
        match self {
            FailureState::Clear => {
                *self = FailureState::Alerted;
                true
            }
            FailureState::Alerted => false,
        }
    }

    pub fn clear(&mut self) {
        *self = FailureState::Clear;
    }
}

/// What a single poll cycle did
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// Nothing new; cursor advanced
    Unchanged,
    /// A status change was delivered; cursor advanced
    Notified(NotificationRecord),
    /// The cycle failed; cursor kept. `alert` is `None` when suppressed.
    Failed {
        error: String,
        alert: Option<NotificationRecord>,
    },
}

impl CycleOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, CycleOutcome::Failed { .. })
    }
}
