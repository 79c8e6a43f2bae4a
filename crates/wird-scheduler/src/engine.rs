use std::sync::Arc;

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};
use wird_core::{
    catalogue, owned_ids, Category, ReminderDefinition, ReminderId, RESCHEDULER_ID,
    RESCHEDULER_TIME,
};

use crate::{
    clock::{Clock, SystemClock},
    epoch::{day_key, EpochGate},
    error::{Result, SchedulerError, TimerError},
    schedule::next_fire,
    store::KeyValueStore,
    timer::{ArmMode, TimerFacility, WakeupPayload},
    trigger::Trigger,
};

/// Outcome of one [`Scheduler::schedule_all`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleReport {
    /// Reminder wake-ups newly armed.
    pub armed: usize,
    /// Reminders skipped because a wake-up with their id already existed.
    pub skipped: usize,
    /// Reminders the timer facility refused.
    pub failed: usize,
    /// The epoch already matched today, so only the rescheduler was verified.
    pub short_circuited: bool,
    /// A rescheduler wake-up exists after the pass.
    pub rescheduler_armed: bool,
}

impl ScheduleReport {
    /// Every reminder and the rescheduler are in place.
    pub fn is_complete(&self) -> bool {
        self.failed == 0 && self.rescheduler_armed
    }
}

/// One row of the intended daily schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlannedWakeup {
    pub id: ReminderId,
    pub category: Category,
    pub hour: u8,
    pub minute: u8,
}

/// Point-in-time view of the scheduler, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchedulerStatus {
    /// Persisted epoch as `YYYY-M-D`, if readable.
    pub epoch: Option<String>,
    pub scheduled_today: bool,
    pub allows_while_idle: bool,
    pub rescheduler_armed: bool,
    pub planned: usize,
}

enum ArmOutcome {
    Armed,
    AlreadyArmed,
}

/// Arms one-shot wake-ups for the reminder catalogue, once per day.
///
/// Holds no mutable state of its own: the timer facility decides what is
/// armed and the epoch in the key-value store decides whether today's pass
/// already ran. Safe to share across threads and to call from concurrent
/// triggers; a lost race re-arms an id rather than arming it twice.
pub struct Scheduler<Tz: TimeZone = Local> {
    timer: Arc<dyn TimerFacility>,
    epoch: EpochGate,
    clock: Arc<dyn Clock<Tz>>,
    completion_delay: Duration,
}

impl Scheduler<Local> {
    /// Scheduler on the device's local clock.
    pub fn new(timer: Arc<dyn TimerFacility>, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(timer, store, Arc::new(SystemClock))
    }
}

impl<Tz: TimeZone> Scheduler<Tz> {
    pub fn with_clock(
        timer: Arc<dyn TimerFacility>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock<Tz>>,
    ) -> Self {
        Self {
            timer,
            epoch: EpochGate::new(store),
            clock,
            completion_delay: Duration::seconds(
                wird_core::config::DEFAULT_COMPLETION_DELAY_SECS as i64,
            ),
        }
    }

    pub fn with_completion_delay(mut self, delay: Duration) -> Self {
        self.completion_delay = delay;
        self
    }

    /// Arm today's wake-up set unless it is already armed.
    ///
    /// When the epoch matches today only the rescheduler is verified (and
    /// armed if missing). Otherwise every owned wake-up is cancelled, each
    /// catalogue entry is armed at its next fire instant, the rescheduler is
    /// armed for 23:59, and today is recorded, but only if nothing failed,
    /// so an incomplete pass is retried by the next trigger.
    pub fn schedule_all(&self) -> ScheduleReport {
        self.schedule_all_inner(false)
    }

    /// Run the pass an external trigger asks for, clearing the epoch first
    /// for every trigger except a plain app start.
    ///
    /// If the epoch cannot be cleared the pass runs in full anyway: a stale
    /// "today" must never turn a boot into a short-circuit.
    #[instrument(skip(self))]
    pub fn on_trigger(&self, trigger: Trigger) -> ScheduleReport {
        info!(%trigger, "scheduling trigger received");
        let mut force = false;
        if trigger.clears_epoch() {
            if let Err(e) = self.clear_epoch() {
                warn!(%trigger, error = %e, "could not clear scheduling epoch; forcing full pass");
                force = true;
            }
        }
        self.schedule_all_inner(force)
    }

    #[instrument(skip(self))]
    fn schedule_all_inner(&self, force: bool) -> ScheduleReport {
        let now = self.clock.now();
        let today = now.date_naive();
        info!(
            %today,
            allows_while_idle = self.timer.allows_while_idle(),
            "scheduling all reminders"
        );

        if !force && self.epoch.is_current(today) {
            info!(
                epoch = %day_key(today),
                "reminders already scheduled today; skipping to avoid duplicates"
            );
            return ScheduleReport {
                short_circuited: true,
                rescheduler_armed: self.ensure_rescheduler(&now),
                ..ScheduleReport::default()
            };
        }

        self.cancel_all();

        let mut report = ScheduleReport::default();
        for def in catalogue() {
            match self.schedule_exact(def, &now) {
                Ok(ArmOutcome::Armed) => report.armed += 1,
                Ok(ArmOutcome::AlreadyArmed) => report.skipped += 1,
                Err(e) => {
                    error!(id = %def.id, error = %e, "failed to arm reminder");
                    report.failed += 1;
                }
            }
        }
        report.rescheduler_armed = self.ensure_rescheduler(&now);

        if report.is_complete() {
            if let Err(e) = self.epoch.mark(today) {
                warn!(error = %e, "could not record scheduling epoch");
            }
        } else {
            warn!(
                failed = report.failed,
                rescheduler_armed = report.rescheduler_armed,
                "scheduling pass incomplete; epoch left unset"
            );
        }

        info!(
            expected = catalogue().len(),
            armed = report.armed,
            skipped = report.skipped,
            failed = report.failed,
            "all reminders processed"
        );
        report
    }

    /// Cancel every wake-up a scheduling pass owns. Missing ones are ignored.
    pub fn cancel_all(&self) {
        debug!("cancelling all owned wake-ups");
        for id in owned_ids() {
            self.cancel(id);
        }
    }

    /// Cancel a single wake-up. A missing wake-up is a no-op.
    pub fn cancel(&self, id: ReminderId) {
        match self.timer.cancel(id) {
            Ok(()) => debug!(%id, "wake-up cancelled"),
            Err(e) => warn!(%id, error = %e, "cancel failed; ignoring"),
        }
    }

    /// Forget which day was last scheduled, forcing the next pass to re-arm.
    pub fn clear_epoch(&self) -> Result<()> {
        self.epoch.clear()?;
        info!("scheduling epoch cleared");
        Ok(())
    }

    /// The intended daily schedule: every catalogue entry plus the rescheduler.
    ///
    /// Derived from the catalogue alone. It does not query the timer facility,
    /// so it reports what a pass would arm, not what is armed right now.
    pub fn list_planned(&self) -> Vec<PlannedWakeup> {
        let (hour, minute) = RESCHEDULER_TIME;
        catalogue()
            .iter()
            .map(|def| PlannedWakeup {
                id: def.id,
                category: def.category,
                hour: def.hour,
                minute: def.minute,
            })
            .chain(std::iter::once(PlannedWakeup {
                id: RESCHEDULER_ID,
                category: Category::Rescheduler,
                hour,
                minute,
            }))
            .collect()
    }

    pub fn status(&self) -> SchedulerStatus {
        let epoch = self.epoch.read();
        SchedulerStatus {
            epoch: epoch.map(day_key),
            scheduled_today: epoch == Some(self.clock.now().date_naive()),
            allows_while_idle: self.timer.allows_while_idle(),
            rescheduler_armed: self.timer.exists(RESCHEDULER_ID),
            planned: catalogue().len() + 1,
        }
    }

    /// Arm the one-shot "daily tasks completed" notice a few seconds from now,
    /// replacing any notice still pending. Returns the fire instant.
    #[instrument(skip(self))]
    pub fn schedule_completion_notice(&self) -> Result<DateTime<Utc>> {
        let at = self.clock.now().with_timezone(&Utc) + self.completion_delay;
        let mode = self.arm_exact(at, WakeupPayload::completion())?;
        info!(%at, ?mode, "completion notice armed");
        Ok(at)
    }

    // --- private helpers ---------------------------------------------------

    fn schedule_exact(
        &self,
        def: &ReminderDefinition,
        now: &DateTime<Tz>,
    ) -> Result<ArmOutcome> {
        let at = next_fire(now, def.hour, def.minute).ok_or(SchedulerError::InvalidTime {
            id: def.id,
            hour: def.hour,
            minute: def.minute,
        })?;

        // Another trigger may have armed this id since we cancelled it.
        if self.timer.exists(def.id) {
            info!(
                id = %def.id,
                hour = def.hour,
                minute = def.minute,
                "skipping duplicate schedule"
            );
            return Ok(ArmOutcome::AlreadyArmed);
        }

        let mode = self.arm_exact(at.with_timezone(&Utc), WakeupPayload::reminder(def))?;
        info!(
            id = %def.id,
            title = def.title,
            at = %at.naive_local(),
            ?mode,
            "reminder armed"
        );
        Ok(ArmOutcome::Armed)
    }

    /// Make sure exactly one rescheduler wake-up exists. Returns whether one
    /// exists afterwards.
    fn ensure_rescheduler(&self, now: &DateTime<Tz>) -> bool {
        if self.timer.exists(RESCHEDULER_ID) {
            debug!("daily rescheduler already set");
            return true;
        }
        let (hour, minute) = RESCHEDULER_TIME;
        let Some(at) = next_fire(now, hour, minute) else {
            error!("no valid instant for the daily rescheduler");
            return false;
        };
        match self.arm_exact(at.with_timezone(&Utc), WakeupPayload::rescheduler()) {
            Ok(mode) => {
                info!(
                    id = %RESCHEDULER_ID,
                    at = %at.naive_local(),
                    ?mode,
                    "daily rescheduler set"
                );
                true
            }
            Err(e) => {
                error!(error = %e, "failed to arm daily rescheduler");
                false
            }
        }
    }

    /// Arm with the power-saving bypass when the facility offers it, falling
    /// back to a plain exact wake-up when it does not or refuses.
    fn arm_exact(
        &self,
        at: DateTime<Utc>,
        payload: WakeupPayload,
    ) -> std::result::Result<ArmMode, TimerError> {
        let id = payload.id;
        if self.timer.allows_while_idle() {
            match self.timer.arm(at, ArmMode::ExactAllowWhileIdle, payload.clone()) {
                Ok(()) => return Ok(ArmMode::ExactAllowWhileIdle),
                Err(TimerError::CapabilityUnavailable) => {
                    warn!(%id, "allow-while-idle refused; falling back to exact");
                }
                Err(e) => return Err(e),
            }
        }
        self.timer.arm(at, ArmMode::Exact, payload)?;
        Ok(ArmMode::Exact)
    }
}
