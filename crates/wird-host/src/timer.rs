//! One-shot wake-ups on the tokio runtime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, warn};
use wird_core::ReminderId;
use wird_scheduler::{ArmMode, TimerError, TimerFacility, WakeupPayload};

struct Entry {
    token: u64,
    at: DateTime<Utc>,
    task: Option<AbortHandle>,
}

/// Timer facility backed by one sleeping tokio task per armed id.
///
/// Fired payloads are sent on the channel given to [`TokioTimer::new`].
/// Wake-ups live in this process only; nothing survives a restart, which is
/// why the host treats every start as a boot.
pub struct TokioTimer {
    entries: Arc<DashMap<ReminderId, Entry>>,
    fired_tx: mpsc::Sender<WakeupPayload>,
    runtime: Handle,
    allow_while_idle: bool,
    next_token: AtomicU64,
}

impl TokioTimer {
    /// Must be called from within a tokio runtime.
    pub fn new(fired_tx: mpsc::Sender<WakeupPayload>, allow_while_idle: bool) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            fired_tx,
            runtime: Handle::current(),
            allow_while_idle,
            next_token: AtomicU64::new(1),
        }
    }

    /// Armed ids and their fire instants, earliest first.
    pub fn pending(&self) -> Vec<(ReminderId, DateTime<Utc>)> {
        let mut pending: Vec<_> = self
            .entries
            .iter()
            .map(|e| (*e.key(), e.value().at))
            .collect();
        pending.sort_by_key(|(id, at)| (*at, *id));
        pending
    }
}

impl TimerFacility for TokioTimer {
    fn allows_while_idle(&self) -> bool {
        self.allow_while_idle
    }

    fn arm(
        &self,
        at: DateTime<Utc>,
        mode: ArmMode,
        payload: WakeupPayload,
    ) -> Result<(), TimerError> {
        if mode == ArmMode::ExactAllowWhileIdle && !self.allow_while_idle {
            return Err(TimerError::CapabilityUnavailable);
        }
        if self.fired_tx.is_closed() {
            return Err(TimerError::Unavailable(
                "fired wake-up receiver dropped".to_string(),
            ));
        }

        let id = payload.id;
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let replaced = self.entries.insert(
            id,
            Entry {
                token,
                at,
                task: None,
            },
        );
        if let Some(task) = replaced.and_then(|old| old.task) {
            task.abort();
        }

        // A past instant fires immediately.
        let delay = (at - Utc::now()).to_std().unwrap_or_default();
        let entries = Arc::clone(&self.entries);
        let fired_tx = self.fired_tx.clone();
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // Only the most recent arm for this id may fire.
            if entries.remove_if(&id, |_, e| e.token == token).is_none() {
                return;
            }
            debug!(%id, "wake-up fired");
            if fired_tx.send(payload).await.is_err() {
                warn!(%id, "fired wake-up dropped; receiver closed");
            }
        });

        if let Some(mut entry) = self.entries.get_mut(&id) {
            if entry.token == token {
                entry.task = Some(handle.abort_handle());
            }
        }
        Ok(())
    }

    fn exists(&self, id: ReminderId) -> bool {
        self.entries.contains_key(&id)
    }

    fn cancel(&self, id: ReminderId) -> Result<(), TimerError> {
        if let Some((_, entry)) = self.entries.remove(&id) {
            if let Some(task) = entry.task {
                task.abort();
            }
        }
        Ok(())
    }
}
