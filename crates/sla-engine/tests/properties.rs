//! Property tests for deadline computation.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use proptest::prelude::*;
use sla_engine::{
    compute_deadline, compute_deadline_for_schedule, CoverageSchedule, DeadlineOptions,
    HolidaySet, OpenHours, WalkLimit,
};

const HOUR: i64 = 3_600;

fn tz() -> Tz {
    chrono_tz::Europe::Berlin
}

/// Instants in the first half of 2026, on whole minutes.
fn arb_start() -> impl Strategy<Value = DateTime<Tz>> {
    (0i64..180 * 24 * 60).prop_map(|minutes| {
        let base = tz().with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap();
        base + Duration::minutes(minutes)
    })
}

/// Per-day hours between 06:00 and 22:00 in half-hour steps; some days closed.
fn arb_schedule() -> impl Strategy<Value = CoverageSchedule> {
    prop::array::uniform7((12i64..44, 0i64..20, any::<bool>())).prop_map(|days| {
        let hours = days.map(|(open, len, closed)| {
            if closed {
                OpenHours::CLOSED
            } else {
                let start = open * 1_800;
                OpenHours::from_seconds(start, (start + len * 1_800).min(22 * HOUR)).unwrap()
            }
        });
        CoverageSchedule::new("generated", hours)
    })
}

/// Weekday instants between 09:00 and 17:00 local time.
fn arb_office_hours_start() -> impl Strategy<Value = DateTime<Tz>> {
    (0i64..130, 0u32..480).prop_map(|(workday, minute)| {
        // 2026-01-05 is a Monday
        let monday = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let date = monday + Duration::days(workday / 5 * 7 + workday % 5);
        let time = NaiveTime::from_hms_opt(9 + minute / 60, minute % 60, 0).unwrap();
        tz().from_local_datetime(&date.and_time(time)).single().unwrap()
    })
}

fn office() -> CoverageSchedule {
    CoverageSchedule::weekdays("office", OpenHours::from_hours(9.0, 17.0).unwrap())
}

proptest! {
    #[test]
    fn prop_no_coverage_passes_through(start in arb_start(), duration in 0u64..10_000_000) {
        let holidays: HolidaySet = [start.date_naive()].into_iter().collect();
        let d = compute_deadline(&start, duration, &[], &holidays, &DeadlineOptions::default()).unwrap();
        prop_assert_eq!(d, start + Duration::seconds(duration as i64));
    }

    #[test]
    fn prop_deadline_never_before_start(
        start in arb_start(),
        schedule in arb_schedule(),
        duration in 0u64..200 * 3_600,
    ) {
        prop_assume!(schedule.weekly_open_seconds() > 0);
        let d = compute_deadline_for_schedule(&schedule, &HolidaySet::new(), duration, &start, WalkLimit::Derived).unwrap();
        prop_assert!(d >= start + Duration::seconds(duration as i64));
    }

    #[test]
    fn prop_monotonic_in_duration(
        start in arb_start(),
        schedule in arb_schedule(),
        a in 0u64..100 * 3_600,
        b in 0u64..100 * 3_600,
    ) {
        prop_assume!(schedule.weekly_open_seconds() > 0);
        let (short, long) = if a <= b { (a, b) } else { (b, a) };
        let holidays = HolidaySet::new();
        let d_short = compute_deadline_for_schedule(&schedule, &holidays, short, &start, WalkLimit::Derived).unwrap();
        let d_long = compute_deadline_for_schedule(&schedule, &holidays, long, &start, WalkLimit::Derived).unwrap();
        prop_assert!(d_short <= d_long);
    }

    #[test]
    fn prop_zero_duration_inside_window_is_start(start in arb_office_hours_start()) {
        let d = compute_deadline_for_schedule(&office(), &HolidaySet::new(), 0, &start, WalkLimit::Derived).unwrap();
        prop_assert_eq!(d, start);
    }

    #[test]
    fn prop_holiday_after_start_delays_deadline(
        start in arb_start(),
        duration in 1u64..80 * 3_600,
    ) {
        let schedule = office();
        // First weekday strictly after the start date
        let mut day = start.date_naive().succ_opt().unwrap();
        while schedule.open_hours(day.weekday()).is_closed() {
            day = day.succ_opt().unwrap();
        }
        let holidays: HolidaySet = [day].into_iter().collect();
        let without = compute_deadline_for_schedule(&schedule, &HolidaySet::new(), duration, &start, WalkLimit::Derived).unwrap();
        let with = compute_deadline_for_schedule(&schedule, &holidays, duration, &start, WalkLimit::Derived).unwrap();
        prop_assume!(without > holiday_midnight(day));
        prop_assert!(with - without >= Duration::hours(8));
    }

    #[test]
    fn prop_subset_schedule_wins(
        start in arb_start(),
        duration in 0u64..80 * 3_600,
    ) {
        let narrow = office();
        let wide = CoverageSchedule::weekdays("wide", OpenHours::from_hours(7.0, 20.0).unwrap())
            .with_day(chrono::Weekday::Sat, OpenHours::from_hours(10.0, 14.0).unwrap());
        let holidays = HolidaySet::new();
        let options = DeadlineOptions::default();
        let both = compute_deadline(&start, duration, &[wide.clone(), narrow.clone()], &holidays, &options).unwrap();
        let narrow_only = compute_deadline(&start, duration, &[narrow], &holidays, &options).unwrap();
        let wide_only = compute_deadline(&start, duration, &[wide], &holidays, &options).unwrap();
        prop_assert!(wide_only <= narrow_only);
        prop_assert_eq!(both, wide_only);
    }
}

fn holiday_midnight(day: NaiveDate) -> DateTime<Tz> {
    tz().from_local_datetime(&day.and_hms_opt(0, 0, 0).unwrap())
        .earliest()
        .unwrap()
}
