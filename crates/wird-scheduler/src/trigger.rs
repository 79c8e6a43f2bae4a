use std::fmt;

use serde::{Deserialize, Serialize};

/// External events that ask for a scheduling pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Device finished booting; every previously armed wake-up is gone.
    Boot,
    /// The host application was updated in place.
    PackageReplaced,
    /// The host application came to the foreground.
    AppStart,
    /// The daily 23:59 rescheduler wake-up fired.
    Rescheduler,
}

impl Trigger {
    /// Whether the epoch is cleared before the pass.
    ///
    /// Only a plain app start keeps it, so repeated opens during a day hit
    /// the same-day short-circuit.
    pub fn clears_epoch(self) -> bool {
        !matches!(self, Trigger::AppStart)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trigger::Boot => "boot",
            Trigger::PackageReplaced => "package_replaced",
            Trigger::AppStart => "app_start",
            Trigger::Rescheduler => "rescheduler",
        };
        write!(f, "{s}")
    }
}
