use thiserror::Error;
use wird_core::ReminderId;

/// Errors that can occur within the scheduler subsystem.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The persisted key-value store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The timer facility refused or failed an operation.
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// No local instant exists for the requested wall-clock time.
    #[error("No valid fire instant for reminder {id} at {hour:02}:{minute:02}")]
    InvalidTime { id: ReminderId, hour: u8, minute: u8 },
}

/// Errors reported by a [`TimerFacility`](crate::timer::TimerFacility).
#[derive(Debug, Error)]
pub enum TimerError {
    /// The power-saving-bypass arming mode is not grantable right now.
    #[error("Allow-while-idle arming is unavailable")]
    CapabilityUnavailable,

    /// The facility rejected this particular wake-up.
    #[error("Wake-up {id} rejected: {reason}")]
    Rejected { id: ReminderId, reason: String },

    /// The facility itself is not reachable.
    #[error("Timer facility unavailable: {0}")]
    Unavailable(String),
}

/// Errors reported by a [`KeyValueStore`](crate::store::KeyValueStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite / rusqlite error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The store could not be reached (poisoned lock, closed handle, ...).
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
