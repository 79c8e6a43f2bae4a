use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use wird_core::{Category, ReminderId};

use crate::delivery::RawDelivery;
use crate::error::DisplayError;

/// A button on a rendered notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoticeAction {
    /// Bring the host application to the foreground.
    OpenApp,
    /// Dismiss the notice; pressing it hands `delivery` back to the dispatcher.
    Dismiss { delivery: RawDelivery },
}

impl NoticeAction {
    pub fn label(&self) -> &'static str {
        match self {
            NoticeAction::OpenApp => "Open App",
            NoticeAction::Dismiss { .. } => "Dismiss",
        }
    }
}

/// A user-visible alert. `id` is the notice's identity: presenting a second
/// notice with the same id replaces the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub id: ReminderId,
    pub category: Option<Category>,
    pub title: String,
    pub body: String,
    pub actions: Vec<NoticeAction>,
}

impl Notice {
    /// A reminder notice with the standard open/dismiss actions.
    pub fn reminder(id: ReminderId, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            category: id.category(),
            title: title.into(),
            body: body.into(),
            actions: vec![
                NoticeAction::OpenApp,
                NoticeAction::Dismiss {
                    delivery: RawDelivery::dismiss(id),
                },
            ],
        }
    }
}

/// The notification-rendering layer of the host.
pub trait DisplayLayer: Send + Sync {
    /// Render `notice`, replacing any visible notice with the same id.
    fn present(&self, notice: &Notice) -> Result<(), DisplayError>;
}

/// Records notices instead of rendering them.
#[derive(Default)]
pub struct MemoryDisplay {
    visible: Mutex<HashMap<ReminderId, Notice>>,
    presented: Mutex<Vec<Notice>>,
    blocked: Mutex<Option<String>>,
}

impl MemoryDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every subsequent `present` with `reason`.
    pub fn block(&self, reason: &str) {
        *self.blocked.lock().expect("memory display poisoned") = Some(reason.to_string());
    }

    /// Currently visible notices, one per id, ordered by id.
    pub fn visible(&self) -> Vec<Notice> {
        let visible = self.visible.lock().expect("memory display poisoned");
        let mut notices: Vec<_> = visible.values().cloned().collect();
        notices.sort_by_key(|n| n.id);
        notices
    }

    /// Every notice ever presented, in order.
    pub fn presented(&self) -> Vec<Notice> {
        self.presented.lock().expect("memory display poisoned").clone()
    }
}

impl DisplayLayer for MemoryDisplay {
    fn present(&self, notice: &Notice) -> Result<(), DisplayError> {
        if let Some(reason) = self.blocked.lock().expect("memory display poisoned").clone() {
            return Err(DisplayError::Blocked(reason));
        }
        self.visible
            .lock()
            .expect("memory display poisoned")
            .insert(notice.id, notice.clone());
        self.presented
            .lock()
            .expect("memory display poisoned")
            .push(notice.clone());
        Ok(())
    }
}
