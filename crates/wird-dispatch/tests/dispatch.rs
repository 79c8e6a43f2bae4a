// End-to-end dispatch: wake-ups armed by the scheduler, fired by the
// in-memory timer and handed to the dispatcher.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use wird_core::{ReminderId, COMPLETION_ID, COMPLETION_TITLE, RESCHEDULER_ID};
use wird_dispatch::{
    Delivery, DispatchHandler, DispatchOutcome, MemoryDisplay, NoticeAction, RawDelivery,
};
use wird_scheduler::{FixedClock, MemoryStore, MemoryTimer, Scheduler};

fn utc(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, h, m, 0).unwrap()
}

struct Rig {
    timer: Arc<MemoryTimer>,
    clock: Arc<FixedClock<Utc>>,
    scheduler: Scheduler<Utc>,
    display: Arc<MemoryDisplay>,
    handler: DispatchHandler,
}

fn rig(now: DateTime<Utc>) -> Rig {
    let timer = Arc::new(MemoryTimer::new());
    let clock = Arc::new(FixedClock::new(now));
    let scheduler: Scheduler<Utc> =
        Scheduler::with_clock(timer.clone(), Arc::new(MemoryStore::new()), clock.clone());
    let display = Arc::new(MemoryDisplay::new());
    let handler = DispatchHandler::new(display.clone());
    Rig {
        timer,
        clock,
        scheduler,
        display,
        handler,
    }
}

#[test]
fn fired_reminder_is_presented() {
    let r = rig(utc(5, 0));
    r.scheduler.schedule_all();
    let payload = r.timer.fire(ReminderId(1000)).unwrap();

    let outcome = r.handler.handle(payload.into());

    assert_eq!(outcome, DispatchOutcome::Presented { id: ReminderId(1000) });
    let visible = r.display.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].title, "Task Reminder");
    assert_eq!(visible[0].actions.len(), 2);
}

#[test]
fn dispatch_never_arms_anything() {
    let r = rig(utc(5, 0));
    r.scheduler.schedule_all();
    let calls = r.timer.arm_calls();

    r.clock.set(utc(6, 0));
    for (_, payload) in r.timer.fire_due(utc(6, 0)) {
        r.handler.handle(payload.into());
    }

    assert_eq!(r.timer.arm_calls(), calls);
    assert!(r.timer.get(ReminderId(1000)).is_none());
}

#[test]
fn same_id_twice_leaves_one_visible_notice() {
    let r = rig(utc(5, 0));
    let fire = |title: &str| Delivery::Fire {
        id: ReminderId(2000),
        title: title.to_string(),
        body: "b".to_string(),
    };
    r.handler.handle(fire("morning"));
    r.handler.handle(fire("again"));

    let visible = r.display.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].title, "again");
}

#[test]
fn dismiss_button_round_trip_is_a_no_op() {
    let r = rig(utc(5, 0));
    r.handler.handle(Delivery::Fire {
        id: ReminderId(3000),
        title: "Dua Reminder".to_string(),
        body: "b".to_string(),
    });
    let notice = r.display.visible().remove(0);
    let NoticeAction::Dismiss { delivery } = notice.actions[1].clone() else {
        panic!("expected a dismiss action");
    };
    let json = delivery.to_json().unwrap();

    let outcome = r
        .handler
        .handle(RawDelivery::from_json(&json).unwrap().decode());

    assert_eq!(outcome, DispatchOutcome::Dismissed { id: ReminderId(3000) });
    assert_eq!(r.display.presented().len(), 1);
    assert_eq!(r.timer.arm_calls(), 0);
}

#[test]
fn blocked_display_fails_without_panicking() {
    let r = rig(utc(5, 0));
    r.display.block("notifications disabled");

    let outcome = r.handler.handle(Delivery::Fire {
        id: ReminderId(1001),
        title: "t".to_string(),
        body: "b".to_string(),
    });

    match outcome {
        DispatchOutcome::Failed { id, reason } => {
            assert_eq!(id, ReminderId(1001));
            assert!(reason.contains("notifications disabled"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(r.display.visible().is_empty());
    assert_eq!(r.handler.history().len(), 1);
}

#[test]
fn rescheduler_payload_is_not_rendered() {
    let r = rig(utc(5, 0));
    r.scheduler.schedule_all();
    let payload = r.timer.fire(RESCHEDULER_ID).unwrap();

    assert_eq!(r.handler.handle(payload.into()), DispatchOutcome::Ignored);
    assert!(r.display.presented().is_empty());
}

#[test]
fn completion_notice_is_presented_after_delay() {
    let r = rig(utc(21, 0));
    let at = r.scheduler.schedule_completion_notice().unwrap();
    assert_eq!(at, utc(21, 0) + Duration::seconds(5));

    let fired = r.timer.fire_due(at);
    assert_eq!(fired.len(), 1);
    let (_, payload) = fired.into_iter().next().unwrap();
    let outcome = r.handler.handle(payload.into());

    assert_eq!(outcome, DispatchOutcome::Presented { id: COMPLETION_ID });
    assert_eq!(r.display.visible()[0].title, COMPLETION_TITLE);
}
