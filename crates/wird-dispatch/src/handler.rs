use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, instrument, warn};
use wird_core::ReminderId;

use crate::delivery::Delivery;
use crate::display::{DisplayLayer, Notice};

/// Dispatch records kept in memory.
const HISTORY_LIMIT: usize = 100;

/// What the handler did with one delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Presented { id: ReminderId },
    Dismissed { id: ReminderId },
    /// The display layer failed; the notice for `id` is missing today.
    Failed { id: ReminderId, reason: String },
    /// Not a notice (a rescheduler fire); left to whoever routes triggers.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchRecord {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub outcome: DispatchOutcome,
}

/// Turns fired wake-ups into notices.
///
/// Runs once per fire and never arms anything: the wake-up that just fired
/// has already consumed itself, and its next occurrence is the daily
/// rescheduler's job.
pub struct DispatchHandler {
    display: Arc<dyn DisplayLayer>,
    history: Mutex<VecDeque<DispatchRecord>>,
}

impl DispatchHandler {
    pub fn new(display: Arc<dyn DisplayLayer>) -> Self {
        Self {
            display,
            history: Mutex::new(VecDeque::with_capacity(HISTORY_LIMIT)),
        }
    }

    /// Handle one delivery. Display failures are logged and recorded, never
    /// propagated.
    #[instrument(skip(self), fields(id = ?delivery.id()))]
    pub fn handle(&self, delivery: Delivery) -> DispatchOutcome {
        let outcome = match delivery {
            Delivery::Fire { id, title, body } => {
                info!(%id, %title, "wake-up fired");
                let notice = Notice::reminder(id, title, body);
                match self.display.present(&notice) {
                    Ok(()) => {
                        info!(%id, "notice posted");
                        DispatchOutcome::Presented { id }
                    }
                    Err(e) => {
                        error!(%id, error = %e, "failed to post notice");
                        DispatchOutcome::Failed {
                            id,
                            reason: e.to_string(),
                        }
                    }
                }
            }
            Delivery::Dismiss { id } => {
                info!(%id, "dismiss received");
                DispatchOutcome::Dismissed { id }
            }
            Delivery::Reschedule => {
                warn!("rescheduler delivery reached the dispatcher; ignoring");
                DispatchOutcome::Ignored
            }
        };
        self.record(outcome.clone());
        outcome
    }

    /// Recent outcomes, oldest first.
    pub fn history(&self) -> Vec<DispatchRecord> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    fn record(&self, outcome: DispatchOutcome) {
        let mut history = self
            .history
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if history.len() == HISTORY_LIMIT {
            history.pop_front();
        }
        history.push_back(DispatchRecord {
            at: Utc::now(),
            outcome,
        });
    }
}
