//! Decoding of fired wake-ups into a closed set of deliveries.
//!
//! Whatever the timer or the notice's action buttons hand back is decoded
//! exactly once, here, into [`Delivery`]. Past this point nothing inspects
//! action strings.

use serde::{Deserialize, Serialize};
use wird_core::ReminderId;
use wird_scheduler::{WakeupKind, WakeupPayload};

use crate::error::Result;

pub const DEFAULT_TITLE: &str = "Reminder";
pub const DEFAULT_BODY: &str = "Time for your reminder";
pub const DEFAULT_ID: ReminderId = ReminderId::new(1000);

pub const DISMISS_PREFIX: &str = "DISMISS_";
pub const RESCHEDULER_ACTION: &str = "DAILY_RESCHEDULER";

/// A fired wake-up, classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Delivery {
    /// Show a notice for `id`.
    Fire {
        id: ReminderId,
        title: String,
        body: String,
    },
    /// The user dismissed the notice for `id`. Terminal.
    Dismiss { id: ReminderId },
    /// The daily rescheduler fired. Belongs to the scheduler, not the display.
    Reschedule,
}

impl Delivery {
    pub fn id(&self) -> Option<ReminderId> {
        match self {
            Delivery::Fire { id, .. } | Delivery::Dismiss { id } => Some(*id),
            Delivery::Reschedule => None,
        }
    }
}

impl From<WakeupPayload> for Delivery {
    fn from(payload: WakeupPayload) -> Self {
        match payload.kind {
            WakeupKind::Rescheduler => Delivery::Reschedule,
            WakeupKind::Reminder | WakeupKind::Completion => Delivery::Fire {
                id: payload.id,
                title: payload.title,
                body: payload.body,
            },
        }
    }
}

/// Untyped delivery as it crosses a process or platform boundary.
///
/// Every field is optional; missing ones fall back to defaults on decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDelivery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl RawDelivery {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// The raw form of a dismiss button press for `id`.
    pub fn dismiss(id: ReminderId) -> Self {
        Self {
            action: Some(format!("{DISMISS_PREFIX}{id}")),
            id: Some(id.get()),
            ..Self::default()
        }
    }

    pub fn decode(self) -> Delivery {
        let action = self.action.as_deref().unwrap_or_default();
        if action == RESCHEDULER_ACTION {
            return Delivery::Reschedule;
        }
        if let Some(suffix) = action.strip_prefix(DISMISS_PREFIX) {
            let id = suffix
                .parse::<ReminderId>()
                .ok()
                .or(self.id.map(ReminderId::new))
                .unwrap_or(DEFAULT_ID);
            return Delivery::Dismiss { id };
        }
        Delivery::Fire {
            id: self.id.map(ReminderId::new).unwrap_or(DEFAULT_ID),
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            body: self.body.unwrap_or_else(|| DEFAULT_BODY.to_string()),
        }
    }
}

impl From<&WakeupPayload> for RawDelivery {
    fn from(payload: &WakeupPayload) -> Self {
        Self {
            action: Some(payload.action()),
            id: Some(payload.id.get()),
            title: Some(payload.title.clone()),
            body: Some(payload.body.clone()),
        }
    }
}
