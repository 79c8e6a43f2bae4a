//! The compiled-in reminder table.
//!
//! Each category contributes a list of `(hour, minute)` pairs; ids are
//! assigned as `band + index`, so a category's ids stay stable as long as
//! its list is only ever appended to. Adding a category means adding a band
//! in [`Category`] and a `CategoryTable` row here; nothing else changes.

use std::sync::OnceLock;

use serde::Serialize;

use crate::types::{Category, ReminderId};

/// Daily-reset singleton (00:01).
pub const DAILY_RESET_ID: ReminderId = ReminderId::new(Category::DailyReset.band());
/// One-shot "all tasks done" notice, armed on demand and not part of the daily table.
pub const COMPLETION_ID: ReminderId = ReminderId::new(Category::Completion.band());
/// Self-perpetuating wake-up that drives the next day's scheduling pass.
pub const RESCHEDULER_ID: ReminderId = ReminderId::new(Category::Rescheduler.band());
/// Local time-of-day of the rescheduler wake-up.
pub const RESCHEDULER_TIME: (u8, u8) = (23, 59);

pub const COMPLETION_TITLE: &str = "Daily Tasks Completed!";
pub const COMPLETION_BODY: &str = "Congratulations! You've completed all your daily Islamic tasks. May Allah reward you abundantly!";

/// One row of the reminder table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReminderDefinition {
    pub id: ReminderId,
    pub category: Category,
    /// 0–23, local wall-clock.
    pub hour: u8,
    /// 0–59.
    pub minute: u8,
    pub title: &'static str,
    pub body: &'static str,
}

struct CategoryTable {
    category: Category,
    title: &'static str,
    body: &'static str,
    times: &'static [(u8, u8)],
}

const TABLES: &[CategoryTable] = &[
    CategoryTable {
        category: Category::Task,
        title: "Task Reminder",
        body: "Complete your daily Islamic tasks and earn rewards!",
        times: &[(6, 0), (12, 0), (18, 0), (0, 0)],
    },
    CategoryTable {
        category: Category::Dhikr,
        title: "Dhikr Reminder",
        body: "Time for dhikr and remembrance of Allah",
        times: &[(5, 30), (13, 0), (16, 30), (19, 0), (20, 30)],
    },
    CategoryTable {
        category: Category::Dua,
        title: "Dua Reminder",
        body: "Recite your daily duas and supplications",
        times: &[(7, 0), (18, 30)],
    },
    CategoryTable {
        category: Category::DailyReset,
        title: "Daily Reset",
        body: "New day has begun! Reset your daily progress",
        times: &[(0, 1)],
    },
];

/// Every daily reminder, in category order then index order.
pub fn catalogue() -> &'static [ReminderDefinition] {
    static CATALOGUE: OnceLock<Vec<ReminderDefinition>> = OnceLock::new();
    CATALOGUE.get_or_init(|| {
        TABLES
            .iter()
            .flat_map(|table| {
                table
                    .times
                    .iter()
                    .enumerate()
                    .map(move |(index, &(hour, minute))| ReminderDefinition {
                        id: ReminderId::new(table.category.band() + index as u32),
                        category: table.category,
                        hour,
                        minute,
                        title: table.title,
                        body: table.body,
                    })
            })
            .collect()
    })
}

/// Look up a daily reminder by id.
pub fn find(id: ReminderId) -> Option<&'static ReminderDefinition> {
    catalogue().iter().find(|def| def.id == id)
}

/// Every id a scheduling pass owns: the whole table plus the rescheduler.
///
/// The completion notice is absent: a full re-arm must not
/// swallow a pending "tasks completed" notice.
pub fn owned_ids() -> impl Iterator<Item = ReminderId> {
    catalogue()
        .iter()
        .map(|def| def.id)
        .chain(std::iter::once(RESCHEDULER_ID))
}
