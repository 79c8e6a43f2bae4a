use dashmap::DashMap;
use tracing::info;
use wird_core::ReminderId;
use wird_dispatch::{DisplayError, DisplayLayer, Notice, NoticeAction};

/// Renders notices as log lines. Keeps the visible set so a notice that
/// replaces an earlier one with the same id is reported as such.
#[derive(Default)]
pub struct LogDisplay {
    visible: DashMap<ReminderId, Notice>,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Drop a notice from the visible set, as when the user dismisses it.
    pub fn clear(&self, id: ReminderId) -> bool {
        self.visible.remove(&id).is_some()
    }
}

impl DisplayLayer for LogDisplay {
    fn present(&self, notice: &Notice) -> Result<(), DisplayError> {
        let actions: Vec<&str> = notice.actions.iter().map(NoticeAction::label).collect();
        let replaced = self.visible.insert(notice.id, notice.clone()).is_some();
        info!(
            target: "wird_host::notice",
            id = %notice.id,
            replaced,
            actions = ?actions,
            "{}: {}",
            notice.title,
            notice.body
        );
        Ok(())
    }
}
