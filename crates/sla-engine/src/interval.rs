//! Resolution of the open interval containing or following an instant.

use chrono::{DateTime, Datelike, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{Result, SlaError};
use crate::holidays::HolidaySet;
use crate::schedule::CoverageSchedule;
use crate::temporal::{local_midnight, local_wall_clock, seconds_between};

/// One contiguous stretch of open time belonging to a single calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl Interval {
    pub fn duration_seconds(&self) -> i64 {
        seconds_between(&self.start, &self.end)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Half-open containment: `start <= instant < end`.
    pub fn contains(&self, instant: &DateTime<Tz>) -> bool {
        self.start <= *instant && *instant < self.end
    }
}

/// Result of [`next_open_interval`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenInterval {
    Bounded(Interval),
    /// No closing time applies from here on (no schedule configured).
    Unbounded,
}

/// Resolve the open interval that contains or immediately follows `reference`.
///
/// Only the reference's calendar day and the day after are considered: if
/// `reference` is at or past the end of its own day's interval, the next
/// day's interval is returned as-is. A holiday yields an empty interval at
/// that day's local midnight. Without a schedule the result is
/// [`OpenInterval::Unbounded`].
pub fn next_open_interval(
    reference: &DateTime<Tz>,
    holidays: &HolidaySet,
    schedule: Option<&CoverageSchedule>,
) -> Result<OpenInterval> {
    let Some(schedule) = schedule else {
        return Ok(OpenInterval::Unbounded);
    };
    let tz = reference.timezone();
    let day = reference.date_naive();

    let interval = day_interval(day, &tz, holidays, schedule)?;
    if *reference < interval.end {
        return Ok(OpenInterval::Bounded(interval));
    }

    let next_day = day
        .succ_opt()
        .ok_or_else(|| SlaError::InvalidDatetime(format!("no calendar day after {day}")))?;
    tracing::trace!(%reference, %next_day, "reference past today's window, resolving next day");
    day_interval(next_day, &tz, holidays, schedule).map(OpenInterval::Bounded)
}

/// The open interval a schedule defines for one calendar day.
pub fn day_interval(
    day: NaiveDate,
    tz: &Tz,
    holidays: &HolidaySet,
    schedule: &CoverageSchedule,
) -> Result<Interval> {
    let midnight = local_midnight(day, tz)?;
    if holidays.contains(day) {
        return Ok(Interval {
            start: midnight,
            end: midnight,
        });
    }

    let hours = schedule.open_hours(day.weekday());
    Ok(Interval {
        start: local_wall_clock(day, hours.start_seconds(), tz)?,
        end: local_wall_clock(day, hours.end_seconds(), tz)?,
    })
}

/// Successive intervals of `schedule` starting from `start`, one per step of
/// [`next_open_interval`]. Empty intervals (holidays, closed days) are
/// included. The iterator is unbounded; stops after the first error.
pub fn open_intervals<'a>(
    start: DateTime<Tz>,
    holidays: &'a HolidaySet,
    schedule: &'a CoverageSchedule,
) -> OpenIntervals<'a> {
    OpenIntervals {
        cursor: Some(start),
        holidays,
        schedule,
    }
}

pub struct OpenIntervals<'a> {
    cursor: Option<DateTime<Tz>>,
    holidays: &'a HolidaySet,
    schedule: &'a CoverageSchedule,
}

impl Iterator for OpenIntervals<'_> {
    type Item = Result<Interval>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.take()?;
        match next_open_interval(&cursor, self.holidays, Some(self.schedule)) {
            Ok(OpenInterval::Bounded(interval)) => {
                self.cursor = Some(interval.end);
                Some(Ok(interval))
            }
            Ok(OpenInterval::Unbounded) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
