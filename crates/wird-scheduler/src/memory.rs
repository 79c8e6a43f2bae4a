//! In-memory timer facility for tests and simulations.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use wird_core::ReminderId;

use crate::error::TimerError;
use crate::timer::{ArmMode, ArmedWakeup, TimerFacility, WakeupPayload};

/// Deterministic [`TimerFacility`]: nothing fires until [`fire`](Self::fire)
/// or [`fire_due`](Self::fire_due) is called.
pub struct MemoryTimer {
    armed: Mutex<HashMap<ReminderId, ArmedWakeup>>,
    allow_while_idle: AtomicBool,
    /// Advertise the capability but refuse it at arm time.
    revoke_while_idle: AtomicBool,
    failing: Mutex<HashSet<ReminderId>>,
    arm_calls: AtomicUsize,
}

impl Default for MemoryTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTimer {
    pub fn new() -> Self {
        Self {
            armed: Mutex::new(HashMap::new()),
            allow_while_idle: AtomicBool::new(true),
            revoke_while_idle: AtomicBool::new(false),
            failing: Mutex::new(HashSet::new()),
            arm_calls: AtomicUsize::new(0),
        }
    }

    /// A facility on a platform without the power-saving bypass.
    pub fn without_idle_capability() -> Self {
        let timer = Self::new();
        timer.allow_while_idle.store(false, Ordering::SeqCst);
        timer
    }

    /// Keep reporting the capability but reject `ExactAllowWhileIdle` arms,
    /// as when the permission is withdrawn between probe and arm.
    pub fn revoke_while_idle(&self, revoked: bool) {
        self.revoke_while_idle.store(revoked, Ordering::SeqCst);
    }

    /// Make every arm for `id` fail.
    pub fn fail_on(&self, id: ReminderId) {
        self.failing.lock().expect("memory timer poisoned").insert(id);
    }

    pub fn get(&self, id: ReminderId) -> Option<ArmedWakeup> {
        self.armed.lock().expect("memory timer poisoned").get(&id).cloned()
    }

    pub fn armed_at(&self, id: ReminderId) -> Option<DateTime<Utc>> {
        self.get(id).map(|w| w.at)
    }

    /// All armed wake-ups ordered by id.
    pub fn snapshot(&self) -> Vec<ArmedWakeup> {
        let armed = self.armed.lock().expect("memory timer poisoned");
        let mut all: Vec<_> = armed.values().cloned().collect();
        all.sort_by_key(|w| w.id());
        all
    }

    pub fn len(&self) -> usize {
        self.armed.lock().expect("memory timer poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total successful `arm` calls since creation.
    pub fn arm_calls(&self) -> usize {
        self.arm_calls.load(Ordering::SeqCst)
    }

    /// Fire `id` now: the wake-up is consumed and its payload returned.
    pub fn fire(&self, id: ReminderId) -> Option<WakeupPayload> {
        self.armed
            .lock()
            .expect("memory timer poisoned")
            .remove(&id)
            .map(|w| w.payload)
    }

    /// Fire every wake-up due at or before `now`, earliest first.
    pub fn fire_due(&self, now: DateTime<Utc>) -> Vec<(DateTime<Utc>, WakeupPayload)> {
        let mut armed = self.armed.lock().expect("memory timer poisoned");
        let due: Vec<ReminderId> = armed
            .values()
            .filter(|w| w.at <= now)
            .map(|w| w.id())
            .collect();
        let mut fired: Vec<_> = due
            .into_iter()
            .filter_map(|id| armed.remove(&id))
            .map(|w| (w.at, w.payload))
            .collect();
        fired.sort_by_key(|(at, payload)| (*at, payload.id));
        fired
    }
}

impl TimerFacility for MemoryTimer {
    fn allows_while_idle(&self) -> bool {
        self.allow_while_idle.load(Ordering::SeqCst)
    }

    fn arm(
        &self,
        at: DateTime<Utc>,
        mode: ArmMode,
        payload: WakeupPayload,
    ) -> Result<(), TimerError> {
        if self
            .failing
            .lock()
            .expect("memory timer poisoned")
            .contains(&payload.id)
        {
            return Err(TimerError::Rejected {
                id: payload.id,
                reason: "injected failure".to_string(),
            });
        }
        if mode == ArmMode::ExactAllowWhileIdle
            && (!self.allows_while_idle() || self.revoke_while_idle.load(Ordering::SeqCst))
        {
            return Err(TimerError::CapabilityUnavailable);
        }
        let wakeup = ArmedWakeup { at, mode, payload };
        self.armed
            .lock()
            .expect("memory timer poisoned")
            .insert(wakeup.id(), wakeup);
        self.arm_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn exists(&self, id: ReminderId) -> bool {
        self.armed
            .lock()
            .expect("memory timer poisoned")
            .contains_key(&id)
    }

    fn cancel(&self, id: ReminderId) -> Result<(), TimerError> {
        self.armed.lock().expect("memory timer poisoned").remove(&id);
        Ok(())
    }
}
