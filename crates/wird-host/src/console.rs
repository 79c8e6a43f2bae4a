//! Line commands read from stdin while the host runs.
//!
//! A line is either a keyword (`complete`, `status`, `pending`, `history`)
//! or a raw delivery as JSON, e.g. `{"action":"DISMISS_1000","id":1000}`,
//! which stands in for a press on a notice's action button.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::TimeZone;
use tracing::warn;
use wird_dispatch::{Delivery, DispatchHandler, RawDelivery};
use wird_scheduler::Scheduler;

use crate::display::LogDisplay;
use crate::router::{FireRouter, Routed};
use crate::timer::TokioTimer;

pub struct Console<Tz: TimeZone> {
    pub scheduler: Arc<Scheduler<Tz>>,
    pub timer: Arc<TokioTimer>,
    pub display: Arc<LogDisplay>,
    pub handler: Arc<DispatchHandler>,
    pub router: Arc<FireRouter<Tz>>,
}

impl<Tz: TimeZone> Console<Tz> {
    /// Run one command line. Returns the text to echo back, if any.
    pub fn execute(&self, line: &str) -> anyhow::Result<Option<String>> {
        let line = line.trim();
        match line {
            "" => Ok(None),
            "complete" => {
                let at = self.scheduler.schedule_completion_notice()?;
                Ok(Some(format!("completion notice at {at}")))
            }
            "status" => Ok(Some(serde_json::to_string_pretty(
                &self.scheduler.status(),
            )?)),
            "pending" => {
                let mut out = String::new();
                for (id, at) in self.timer.pending() {
                    writeln!(out, "{id}  {at}")?;
                }
                Ok(Some(out.trim_end().to_string()))
            }
            "history" => Ok(Some(serde_json::to_string_pretty(
                &self.handler.history(),
            )?)),
            json if json.starts_with('{') => {
                let delivery = RawDelivery::from_json(json)?.decode();
                if let Delivery::Dismiss { id } = delivery {
                    self.display.clear(id);
                }
                Ok(Some(match self.router.route(delivery) {
                    Routed::Dispatched(outcome) => serde_json::to_string(&outcome)?,
                    Routed::Rescheduled(report) => serde_json::to_string(&report)?,
                }))
            }
            other => {
                warn!(command = other, "unknown console command");
                Ok(Some(format!(
                    "unknown command `{other}` (try complete, status, pending, history or a JSON delivery)"
                )))
            }
        }
    }
}
