//! SLA deadline computation: the interval walk.
//!
//! Starting at `start`, the walk resolves one open interval at a time (see
//! [`next_open_interval`]), adds its open seconds to a running total, and
//! stops as soon as the total reaches the requested duration. The deadline
//! is then `end_of_last_interval - (accumulated - duration)`, i.e. the
//! exact instant inside the last interval where the target is met.
//!
//! Several coverage schedules can apply to the same computation; each is
//! walked independently and the earliest deadline wins, unless
//! [`SchedulePolicy::Strict`] forbids more than one.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::config::CalculatorConfig;
use crate::error::{Result, SlaError};
use crate::holidays::HolidaySet;
use crate::interval::{next_open_interval, OpenInterval};
use crate::schedule::CoverageSchedule;
use crate::temporal::{seconds_between, shift};

/// Number of intervals the legacy walk was allowed to resolve.
pub const LEGACY_INTERVAL_CAP: u32 = 20;

/// What to do when more than one coverage schedule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulePolicy {
    /// Walk every schedule and keep the earliest deadline.
    #[default]
    EarliestWins,
    /// Reject the computation with [`SlaError::MultipleSchedules`].
    Strict,
}

/// Upper bound on the number of intervals one walk may resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkLimit {
    /// Bound derived from the duration, the schedule's weekly open time and
    /// the number of holidays. Always large enough for a satisfiable walk.
    #[default]
    Derived,
    /// At most this many intervals.
    Fixed(u32),
}

impl WalkLimit {
    /// Maximum intervals for walking `schedule` towards `target` seconds.
    ///
    /// A schedule with no open time at all can never satisfy a walk, so
    /// [`WalkLimit::Derived`] reports it as diverged up front.
    pub fn max_intervals(
        &self,
        schedule: &CoverageSchedule,
        holidays: &HolidaySet,
        target: i64,
    ) -> Result<u32> {
        match *self {
            WalkLimit::Fixed(n) => Ok(n),
            WalkLimit::Derived => {
                let weekly = schedule.weekly_open_seconds();
                if weekly <= 0 {
                    return Err(SlaError::ComputationDiverged { intervals: 0 });
                }
                // Each resolved interval covers one calendar day, so seven
                // steps collect a full week of open time. A holiday can cost
                // up to a week when the schedule opens only one day.
                let weeks = target.saturating_add(weekly - 1) / weekly;
                let holidays = i64::try_from(holidays.len()).unwrap_or(i64::MAX);
                let steps = weeks
                    .saturating_add(2)
                    .saturating_add(holidays)
                    .saturating_mul(7)
                    .saturating_add(1);
                Ok(u32::try_from(steps).unwrap_or(u32::MAX))
            }
        }
    }
}

/// Options shared by every walk of one computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeadlineOptions {
    pub policy: SchedulePolicy,
    pub walk_limit: WalkLimit,
}

fn duration_to_i64(duration_seconds: u64) -> Result<i64> {
    i64::try_from(duration_seconds)
        .map_err(|_| SlaError::InvalidDuration(format!("{duration_seconds}s is out of range")))
}

/// Deadline for a single coverage schedule.
///
/// Walks open intervals from `start` until `duration_seconds` of open time
/// have accumulated. Only the part of the first interval after `start`
/// counts. Empty intervals (holidays, closed weekdays) never end the walk,
/// so a zero duration starting in a closed period lands on the start of the
/// next non-empty interval.
///
/// # Errors
///
/// [`SlaError::ComputationDiverged`] if `limit` is exhausted first,
/// [`SlaError::InvalidDuration`] / [`SlaError::InvalidDatetime`] if instant
/// arithmetic leaves the representable range.
pub fn compute_deadline_for_schedule(
    schedule: &CoverageSchedule,
    holidays: &HolidaySet,
    duration_seconds: u64,
    start: &DateTime<Tz>,
    limit: WalkLimit,
) -> Result<DateTime<Tz>> {
    let target = duration_to_i64(duration_seconds)?;
    let max_intervals = limit.max_intervals(schedule, holidays, target)?;

    let mut current = *start;
    let mut accumulated: i64 = 0;

    for step in 0..max_intervals {
        let interval = match next_open_interval(&current, holidays, Some(schedule))? {
            OpenInterval::Bounded(interval) => interval,
            OpenInterval::Unbounded => return shift(&current, target - accumulated),
        };

        let effective_start = (*start).max(interval.start);
        let open = seconds_between(&effective_start, &interval.end).max(0);
        accumulated = accumulated.saturating_add(open);
        current = interval.end;

        tracing::debug!(
            schedule = schedule.name(),
            step,
            start = %interval.start,
            end = %interval.end,
            open,
            accumulated,
            target,
            "resolved open interval"
        );

        if open > 0 && accumulated >= target {
            return shift(&current, target - accumulated);
        }
    }

    tracing::warn!(
        schedule = schedule.name(),
        intervals = max_intervals,
        accumulated,
        target,
        "deadline walk exhausted its interval limit"
    );
    Err(SlaError::ComputationDiverged {
        intervals: max_intervals,
    })
}

/// Deadline for any number of coverage schedules.
///
/// - no schedule: the calendar is open 24×7, result is `start + duration`
///   (holidays do not apply);
/// - one schedule: [`compute_deadline_for_schedule`];
/// - several: each is walked and the earliest deadline is returned, the
///   first one on ties. With [`SchedulePolicy::Strict`] this is an error.
///
/// Local days are those of `start`'s timezone.
pub fn compute_deadline(
    start: &DateTime<Tz>,
    duration_seconds: u64,
    schedules: &[CoverageSchedule],
    holidays: &HolidaySet,
    options: &DeadlineOptions,
) -> Result<DateTime<Tz>> {
    match schedules {
        [] => shift(start, duration_to_i64(duration_seconds)?),
        [only] => {
            compute_deadline_for_schedule(only, holidays, duration_seconds, start, options.walk_limit)
        }
        [first, rest @ ..] => {
            if options.policy == SchedulePolicy::Strict {
                return Err(SlaError::MultipleSchedules {
                    count: schedules.len(),
                });
            }

            let mut earliest = compute_deadline_for_schedule(
                first,
                holidays,
                duration_seconds,
                start,
                options.walk_limit,
            )?;
            let mut winner = first.name();
            for schedule in rest {
                let candidate = compute_deadline_for_schedule(
                    schedule,
                    holidays,
                    duration_seconds,
                    start,
                    options.walk_limit,
                )?;
                if candidate < earliest {
                    earliest = candidate;
                    winner = schedule.name();
                }
            }
            tracing::debug!(schedules = schedules.len(), winner, %earliest, "earliest deadline wins");
            Ok(earliest)
        }
    }
}

/// Something that turns a start instant and an SLA duration into a deadline.
///
/// Embedders hold one of these (e.g. as `Box<dyn DeadlineCalculator>`)
/// instead of relying on a process-wide strategy.
pub trait DeadlineCalculator: Send + Sync {
    fn deadline(
        &self,
        start: DateTime<Tz>,
        duration_seconds: u64,
        schedules: &[CoverageSchedule],
        holidays: &HolidaySet,
    ) -> Result<DateTime<Tz>>;
}

/// Ignores schedules and holidays: every second counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOpenCalculator;

impl DeadlineCalculator for AlwaysOpenCalculator {
    fn deadline(
        &self,
        start: DateTime<Tz>,
        duration_seconds: u64,
        _schedules: &[CoverageSchedule],
        _holidays: &HolidaySet,
    ) -> Result<DateTime<Tz>> {
        shift(&start, duration_to_i64(duration_seconds)?)
    }
}

/// Coverage-window and holiday aware calculator, evaluated in the
/// configured timezone.
#[derive(Debug, Clone, Default)]
pub struct BusinessHoursCalculator {
    config: CalculatorConfig,
}

impl BusinessHoursCalculator {
    pub fn new(config: CalculatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }
}

impl DeadlineCalculator for BusinessHoursCalculator {
    fn deadline(
        &self,
        start: DateTime<Tz>,
        duration_seconds: u64,
        schedules: &[CoverageSchedule],
        holidays: &HolidaySet,
    ) -> Result<DateTime<Tz>> {
        let local_start = start.with_timezone(&self.config.timezone);
        compute_deadline(
            &local_start,
            duration_seconds,
            schedules,
            holidays,
            &self.config.options,
        )
    }
}
