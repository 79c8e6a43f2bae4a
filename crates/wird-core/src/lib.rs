//! `wird-core`: catalogue and shared types for the wird daily reminder scheduler.
//!
//! The catalogue is compiled in: every reminder has a fixed id, a fixed
//! time-of-day and fixed text. Ids are partitioned into one band per
//! [`Category`] so cancel and dedupe keys never collide across categories.
//!
//! | Category      | Band | Entries |
//! |---------------|------|---------|
//! | `Task`        | 1000 | 4       |
//! | `Dhikr`       | 2000 | 5       |
//! | `Dua`         | 3000 | 2       |
//! | `DailyReset`  | 4000 | 1       |
//! | `Completion`  | 5000 | one-shot, not in the daily table |
//! | `Rescheduler` | 9000 | one-shot, re-armed every pass |

pub mod catalogue;
pub mod config;
pub mod error;
pub mod types;

pub use catalogue::{
    catalogue, find, owned_ids, ReminderDefinition, COMPLETION_BODY, COMPLETION_ID,
    COMPLETION_TITLE, DAILY_RESET_ID, RESCHEDULER_ID, RESCHEDULER_TIME,
};
pub use config::WirdConfig;
pub use error::{Result, WirdError};
pub use types::{Category, ReminderId};
