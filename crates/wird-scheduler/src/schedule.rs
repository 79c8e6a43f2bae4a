use chrono::{DateTime, Duration, NaiveDate, TimeZone};

/// Longest wall-clock gap we step over when a DST shift skips a time.
const MAX_GAP_MINUTES: i64 = 180;

/// Compute the next instant at `hour:minute:00` local time strictly after `now`.
///
/// Today's candidate is used if it lies after `now`; otherwise tomorrow's.
/// A candidate equal to `now` counts as passed, since it is already in the
/// past by the time arming completes. The result is never more than one day
/// (plus any DST shift) ahead of `now`.
///
/// Returns `None` for out-of-range `hour`/`minute`.
pub fn next_fire<Tz: TimeZone>(now: &DateTime<Tz>, hour: u8, minute: u8) -> Option<DateTime<Tz>> {
    let tz = now.timezone();
    let today = now.date_naive();
    let candidate = local_instant(&tz, today, hour, minute)?;
    if candidate > *now {
        return Some(candidate);
    }
    // Today's window has passed; advance to tomorrow.
    local_instant(&tz, today.succ_opt()?, hour, minute)
}

/// Resolve a wall-clock time on `date` to an instant in `tz`.
///
/// An ambiguous time (DST fall-back) resolves to its earlier occurrence; a
/// skipped time (DST spring-forward) resolves to the first minute that exists
/// after the gap.
pub fn local_instant<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    hour: u8,
    minute: u8,
) -> Option<DateTime<Tz>> {
    let wall = date.and_hms_opt(u32::from(hour), u32::from(minute), 0)?;
    if let Some(instant) = tz.from_local_datetime(&wall).earliest() {
        return Some(instant);
    }
    (1..=MAX_GAP_MINUTES)
        .find_map(|step| tz.from_local_datetime(&(wall + Duration::minutes(step))).earliest())
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, LocalResult, NaiveDateTime, Timelike, Utc};

    use super::*;

    fn at(d: u32, h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, d, h, m, s).unwrap()
    }

    #[test]
    fn later_today_stays_today() {
        assert_eq!(next_fire(&at(10, 5, 0, 0), 6, 0), Some(at(10, 6, 0, 0)));
    }

    #[test]
    fn earlier_today_rolls_to_tomorrow() {
        assert_eq!(next_fire(&at(10, 7, 0, 0), 6, 0), Some(at(11, 6, 0, 0)));
    }

    #[test]
    fn exactly_now_counts_as_passed() {
        let now = at(10, 6, 0, 0);
        assert_eq!(next_fire(&now, 6, 0), Some(now + Duration::hours(24)));
    }

    #[test]
    fn seconds_past_target_minute_roll_over() {
        assert_eq!(next_fire(&at(10, 6, 0, 1), 6, 0), Some(at(11, 6, 0, 0)));
    }

    #[test]
    fn daily_reset_just_after_midnight() {
        assert_eq!(next_fire(&at(10, 0, 0, 30), 0, 1), Some(at(10, 0, 1, 0)));
    }

    #[test]
    fn result_is_truncated_to_the_minute() {
        let fire = next_fire(&at(10, 12, 34, 56), 23, 59).unwrap();
        assert_eq!((fire.second(), fire.nanosecond()), (0, 0));
    }

    #[test]
    fn month_boundary_rolls_over() {
        let now = Utc.with_ymd_and_hms(2026, 6, 30, 23, 59, 30).unwrap();
        assert_eq!(
            next_fire(&now, 23, 59),
            Some(Utc.with_ymd_and_hms(2026, 7, 1, 23, 59, 0).unwrap())
        );
    }

    #[test]
    fn works_on_local_wall_clock_not_utc() {
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        // 02:30 local is 23:30 UTC the previous day.
        let now = tz.with_ymd_and_hms(2026, 6, 10, 2, 30, 0).unwrap();
        let fire = next_fire(&now, 5, 30).unwrap();
        assert_eq!(fire, tz.with_ymd_and_hms(2026, 6, 10, 5, 30, 0).unwrap());
    }

    #[test]
    fn out_of_range_time_is_none() {
        assert_eq!(next_fire(&at(10, 0, 0, 0), 24, 0), None);
        assert_eq!(next_fire(&at(10, 0, 0, 0), 0, 60), None);
    }

    /// UTC+1 that springs forward to UTC+2 at 01:00 UTC on 2026-03-29, so
    /// local 02:00..03:00 that night does not exist.
    #[derive(Debug, Clone, Copy)]
    struct SpringForward;

    impl SpringForward {
        fn switch() -> NaiveDateTime {
            NaiveDate::from_ymd_opt(2026, 3, 29)
                .unwrap()
                .and_hms_opt(1, 0, 0)
                .unwrap()
        }

        fn offset(hours: i32) -> FixedOffset {
            FixedOffset::east_opt(hours * 3600).unwrap()
        }
    }

    impl TimeZone for SpringForward {
        type Offset = FixedOffset;

        fn from_offset(_offset: &FixedOffset) -> Self {
            SpringForward
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_hms_opt(0, 0, 0).unwrap())
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            let winter = *local - Duration::hours(1) < Self::switch();
            let summer = *local - Duration::hours(2) >= Self::switch();
            match (winter, summer) {
                (true, true) => LocalResult::Ambiguous(Self::offset(1), Self::offset(2)),
                (true, false) => LocalResult::Single(Self::offset(1)),
                (false, true) => LocalResult::Single(Self::offset(2)),
                (false, false) => LocalResult::None,
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_hms_opt(0, 0, 0).unwrap())
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            if *utc < Self::switch() {
                Self::offset(1)
            } else {
                Self::offset(2)
            }
        }
    }

    #[test]
    fn skipped_wall_time_moves_to_end_of_gap() {
        let now = SpringForward.with_ymd_and_hms(2026, 3, 29, 1, 0, 0).unwrap();
        let fire = next_fire(&now, 2, 30).unwrap();

        // 03:00 local summer time is the first minute that exists.
        assert_eq!(
            fire.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2026, 3, 29, 1, 0, 0).unwrap()
        );
        assert_eq!((fire.hour(), fire.minute()), (3, 0));
    }

    #[test]
    fn times_around_the_gap_are_unaffected() {
        let now = SpringForward.with_ymd_and_hms(2026, 3, 29, 1, 0, 0).unwrap();
        let fire = next_fire(&now, 6, 0).unwrap();
        assert_eq!(
            fire.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2026, 3, 29, 4, 0, 0).unwrap()
        );

        let next_day = SpringForward.with_ymd_and_hms(2026, 3, 30, 1, 0, 0).unwrap();
        let fire = next_fire(&next_day, 2, 30).unwrap();
        assert_eq!(
            fire.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2026, 3, 30, 0, 30, 0).unwrap()
        );
    }
}
