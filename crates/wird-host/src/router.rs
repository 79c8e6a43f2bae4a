use std::sync::Arc;

use chrono::TimeZone;
use tracing::info;
use wird_dispatch::{Delivery, DispatchHandler, DispatchOutcome};
use wird_scheduler::{ScheduleReport, Scheduler, Trigger};

/// Where a fired wake-up ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    Dispatched(DispatchOutcome),
    Rescheduled(ScheduleReport),
}

/// Sends rescheduler fires back into the scheduler and everything else to
/// the dispatch handler.
pub struct FireRouter<Tz: TimeZone> {
    scheduler: Arc<Scheduler<Tz>>,
    handler: Arc<DispatchHandler>,
}

impl<Tz: TimeZone> FireRouter<Tz> {
    pub fn new(scheduler: Arc<Scheduler<Tz>>, handler: Arc<DispatchHandler>) -> Self {
        Self { scheduler, handler }
    }

    pub fn route(&self, delivery: Delivery) -> Routed {
        match delivery {
            Delivery::Reschedule => {
                let report = self.scheduler.on_trigger(Trigger::Rescheduler);
                info!(
                    armed = report.armed,
                    failed = report.failed,
                    "daily rescheduler ran"
                );
                Routed::Rescheduled(report)
            }
            other => Routed::Dispatched(self.handler.handle(other)),
        }
    }
}
