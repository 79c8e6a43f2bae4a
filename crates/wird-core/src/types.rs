use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WirdError;

/// Stable identity of a wake-up.
///
/// The same number is the timer facility's dedupe/cancel key and the
/// notification tag, so a second fire for an id replaces the first notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderId(pub u32);

impl ReminderId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Category band this id falls in, if any.
    pub fn category(self) -> Option<Category> {
        Category::of(self)
    }
}

impl fmt::Display for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ReminderId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl FromStr for ReminderId {
    type Err = WirdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|_| WirdError::InvalidId(s.to_string()))
    }
}

/// Reminder category. Each owns a band of 1000 ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Task,
    Dhikr,
    Dua,
    DailyReset,
    Completion,
    Rescheduler,
}

impl Category {
    /// First id of the category's band.
    pub const fn band(self) -> u32 {
        match self {
            Category::Task => 1000,
            Category::Dhikr => 2000,
            Category::Dua => 3000,
            Category::DailyReset => 4000,
            Category::Completion => 5000,
            Category::Rescheduler => 9000,
        }
    }

    /// Human-facing label, used as the `type` column of the planned schedule.
    pub const fn label(self) -> &'static str {
        match self {
            Category::Task => "Task Reminder",
            Category::Dhikr => "Dhikr Reminder",
            Category::Dua => "Dua Reminder",
            Category::DailyReset => "Daily Reset",
            Category::Completion => "Completion",
            Category::Rescheduler => "Daily Rescheduler",
        }
    }

    pub fn of(id: ReminderId) -> Option<Category> {
        match id.get() / 1000 {
            1 => Some(Category::Task),
            2 => Some(Category::Dhikr),
            3 => Some(Category::Dua),
            4 => Some(Category::DailyReset),
            5 => Some(Category::Completion),
            9 => Some(Category::Rescheduler),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Task => "task",
            Category::Dhikr => "dhikr",
            Category::Dua => "dua",
            Category::DailyReset => "daily_reset",
            Category::Completion => "completion",
            Category::Rescheduler => "rescheduler",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Category {
    type Err = WirdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task" => Ok(Category::Task),
            "dhikr" => Ok(Category::Dhikr),
            "dua" => Ok(Category::Dua),
            "daily_reset" => Ok(Category::DailyReset),
            "completion" => Ok(Category::Completion),
            "rescheduler" => Ok(Category::Rescheduler),
            other => Err(WirdError::UnknownCategory(other.to_string())),
        }
    }
}
