//! `wird-scheduler`: idempotent daily scheduling over a one-shot timer.
//!
//! # Overview
//!
//! The host's timer facility only knows one-shot wake-ups. [`Scheduler`]
//! builds daily recurrence on top of it:
//!
//! 1. A trigger (boot, app start, ...) calls [`Scheduler::schedule_all`].
//! 2. If the persisted epoch says today's set is armed, only the 23:59
//!    rescheduler is verified.
//! 3. Otherwise every owned wake-up is cancelled and re-armed at its next
//!    fire instant, then today is recorded.
//! 4. At 23:59 the rescheduler fires, clears the epoch and runs the pass
//!    again for the next day.
//!
//! Fired reminders never schedule anything themselves.
//!
//! # Collaborators
//!
//! | Trait              | Real implementation | Test double     |
//! |--------------------|---------------------|-----------------|
//! | [`TimerFacility`]  | host-provided       | [`MemoryTimer`] |
//! | [`KeyValueStore`]  | [`SqliteStore`]     | [`MemoryStore`] |
//! | [`Clock`]          | [`SystemClock`]     | [`FixedClock`]  |

pub mod clock;
pub mod db;
pub mod engine;
pub mod epoch;
pub mod error;
pub mod memory;
pub mod schedule;
pub mod store;
pub mod timer;
pub mod trigger;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{PlannedWakeup, ScheduleReport, Scheduler, SchedulerStatus};
pub use epoch::{day_key, EpochGate, EPOCH_KEY};
pub use error::{Result, SchedulerError, StoreError, TimerError};
pub use memory::MemoryTimer;
pub use schedule::next_fire;
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
pub use timer::{ArmMode, ArmedWakeup, TimerFacility, WakeupKind, WakeupPayload};
pub use trigger::Trigger;
