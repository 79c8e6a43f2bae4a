//! The one-shot timer facility the scheduler arms wake-ups on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wird_core::{
    ReminderDefinition, ReminderId, COMPLETION_BODY, COMPLETION_ID, COMPLETION_TITLE,
    RESCHEDULER_ID,
};

use crate::error::TimerError;

/// How precisely (and how insistently) a wake-up should fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmMode {
    /// Exact, and fires even while the device is in low-power suspension.
    ExactAllowWhileIdle,
    /// Exact, but may be deferred by power-saving policies.
    Exact,
}

/// What a fired wake-up is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WakeupKind {
    Reminder,
    Completion,
    Rescheduler,
}

/// Opaque data handed back by the timer facility when a wake-up fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakeupPayload {
    pub id: ReminderId,
    pub kind: WakeupKind,
    pub title: String,
    pub body: String,
}

impl WakeupPayload {
    pub fn reminder(def: &ReminderDefinition) -> Self {
        Self {
            id: def.id,
            kind: WakeupKind::Reminder,
            title: def.title.to_string(),
            body: def.body.to_string(),
        }
    }

    pub fn rescheduler() -> Self {
        Self {
            id: RESCHEDULER_ID,
            kind: WakeupKind::Rescheduler,
            title: String::new(),
            body: String::new(),
        }
    }

    pub fn completion() -> Self {
        Self {
            id: COMPLETION_ID,
            kind: WakeupKind::Completion,
            title: COMPLETION_TITLE.to_string(),
            body: COMPLETION_BODY.to_string(),
        }
    }

    /// Action code carried alongside the payload (`REMINDER_1000`, ...).
    pub fn action(&self) -> String {
        match self.kind {
            WakeupKind::Reminder => format!("REMINDER_{}", self.id),
            WakeupKind::Completion => "COMPLETION_NOTIFICATION".to_string(),
            WakeupKind::Rescheduler => "DAILY_RESCHEDULER".to_string(),
        }
    }
}

/// A wake-up as the facility holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmedWakeup {
    pub at: DateTime<Utc>,
    pub mode: ArmMode,
    pub payload: WakeupPayload,
}

impl ArmedWakeup {
    pub fn id(&self) -> ReminderId {
        self.payload.id
    }
}

/// One-shot wake-up primitives. The facility, not the scheduler, is the
/// source of truth for "is this id armed".
///
/// Implementations guarantee at most one armed wake-up per id and deliver
/// each payload exactly once, after which the wake-up no longer exists.
pub trait TimerFacility: Send + Sync {
    /// Whether [`ArmMode::ExactAllowWhileIdle`] is currently grantable.
    fn allows_while_idle(&self) -> bool;

    /// Arm a one-shot wake-up at `at`, replacing any existing one for `payload.id`.
    fn arm(
        &self,
        at: DateTime<Utc>,
        mode: ArmMode,
        payload: WakeupPayload,
    ) -> Result<(), TimerError>;

    /// Existence probe without side effects.
    fn exists(&self, id: ReminderId) -> bool;

    /// Cancel the wake-up for `id`. Cancelling a missing wake-up is a no-op.
    fn cancel(&self, id: ReminderId) -> Result<(), TimerError>;
}
