//! Weekly coverage schedules: one open interval per weekday.
//!
//! A [`CoverageSchedule`] always holds exactly seven [`OpenHours`] entries,
//! indexed Sunday = 0 .. Saturday = 6. Offsets are whole seconds from local
//! midnight and may exceed 24 h, in which case the interval spills into the
//! next calendar day. A day with `start == end` is closed.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlaError};

/// Weekday names in schedule order (Sunday first).
pub const WEEKDAY_NAMES: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Largest accepted offset from local midnight: one week.
pub const MAX_OFFSET_SECONDS: i64 = 7 * 86_400;

/// Open interval for a single weekday, as seconds from local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenHours {
    start: i64,
    end: i64,
}

impl OpenHours {
    /// A zero-length interval.
    pub const CLOSED: OpenHours = OpenHours { start: 0, end: 0 };

    /// Build from second offsets. Rejects negative offsets, offsets past
    /// [`MAX_OFFSET_SECONDS`] and `end < start`.
    pub fn from_seconds(start: i64, end: i64) -> Result<Self> {
        if start < 0 {
            return Err(SlaError::InvalidSchedule(format!(
                "open time {start}s is before midnight"
            )));
        }
        if start.max(end) > MAX_OFFSET_SECONDS {
            return Err(SlaError::InvalidSchedule(format!(
                "offset {}s is more than one week past midnight",
                start.max(end)
            )));
        }
        if end < start {
            return Err(SlaError::InvalidSchedule(format!(
                "close time {end}s is before open time {start}s"
            )));
        }
        Ok(Self { start, end })
    }

    /// Build from fractional hour offsets (e.g. `8.5` = 08:30), rounded to
    /// the nearest second.
    pub fn from_hours(start: f64, end: f64) -> Result<Self> {
        Self::from_seconds(hours_to_seconds(start)?, hours_to_seconds(end)?)
    }

    pub fn start_seconds(&self) -> i64 {
        self.start
    }

    pub fn end_seconds(&self) -> i64 {
        self.end
    }

    pub fn open_seconds(&self) -> i64 {
        self.end - self.start
    }

    pub fn is_closed(&self) -> bool {
        self.start == self.end
    }
}

fn hours_to_seconds(hours: f64) -> Result<i64> {
    if !hours.is_finite() {
        return Err(SlaError::InvalidSchedule(format!(
            "hour offset {hours} is not a finite number"
        )));
    }
    // Saturating cast; out-of-range values are rejected by `from_seconds`.
    Ok((hours * SECONDS_PER_HOUR).round() as i64)
}

/// Weekly coverage window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleRecord", into = "ScheduleRecord")]
pub struct CoverageSchedule {
    name: String,
    description: Option<String>,
    days: [OpenHours; 7],
}

impl CoverageSchedule {
    /// A schedule with the given per-day hours, Sunday first.
    pub fn new(name: impl Into<String>, days: [OpenHours; 7]) -> Self {
        Self {
            name: name.into(),
            description: None,
            days,
        }
    }

    /// A schedule closed every day. Useful as a base for [`with_day`](Self::with_day).
    pub fn always_closed(name: impl Into<String>) -> Self {
        Self::new(name, [OpenHours::CLOSED; 7])
    }

    /// Same hours on Monday..Friday, closed on weekends.
    pub fn weekdays(name: impl Into<String>, hours: OpenHours) -> Self {
        let mut days = [hours; 7];
        days[Weekday::Sat.num_days_from_sunday() as usize] = OpenHours::CLOSED;
        days[Weekday::Sun.num_days_from_sunday() as usize] = OpenHours::CLOSED;
        Self::new(name, days)
    }

    pub fn with_day(mut self, weekday: Weekday, hours: OpenHours) -> Self {
        self.days[weekday.num_days_from_sunday() as usize] = hours;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn open_hours(&self, weekday: Weekday) -> OpenHours {
        self.days[weekday.num_days_from_sunday() as usize]
    }

    pub fn days(&self) -> &[OpenHours; 7] {
        &self.days
    }

    /// Total open seconds in one week.
    pub fn weekly_open_seconds(&self) -> i64 {
        self.days
            .iter()
            .map(OpenHours::open_seconds)
            .fold(0i64, i64::saturating_add)
    }

    /// Smallest nonzero daily open time, or `None` if every day is closed.
    pub fn min_open_day_seconds(&self) -> Option<i64> {
        self.days
            .iter()
            .map(OpenHours::open_seconds)
            .filter(|s| *s > 0)
            .min()
    }
}

/// Serialized form of a [`CoverageSchedule`]: one optional `{start, end}`
/// pair of hour offsets per weekday name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScheduleRecord {
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    sunday: Option<HoursRecord>,
    monday: Option<HoursRecord>,
    tuesday: Option<HoursRecord>,
    wednesday: Option<HoursRecord>,
    thursday: Option<HoursRecord>,
    friday: Option<HoursRecord>,
    saturday: Option<HoursRecord>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct HoursRecord {
    start: f64,
    end: f64,
}

impl TryFrom<ScheduleRecord> for CoverageSchedule {
    type Error = SlaError;

    fn try_from(record: ScheduleRecord) -> Result<Self> {
        let slots = [
            record.sunday,
            record.monday,
            record.tuesday,
            record.wednesday,
            record.thursday,
            record.friday,
            record.saturday,
        ];

        let mut days = [OpenHours::CLOSED; 7];
        for (idx, slot) in slots.into_iter().enumerate() {
            let hours = slot.ok_or_else(|| {
                SlaError::InvalidSchedule(format!(
                    "'{}' has no open/close pair for {}",
                    record.name, WEEKDAY_NAMES[idx]
                ))
            })?;
            days[idx] = OpenHours::from_hours(hours.start, hours.end).map_err(|e| match e {
                SlaError::InvalidSchedule(msg) => SlaError::InvalidSchedule(format!(
                    "'{}' {}: {msg}",
                    record.name, WEEKDAY_NAMES[idx]
                )),
                other => other,
            })?;
        }

        Ok(Self {
            name: record.name,
            description: record.description,
            days,
        })
    }
}

impl From<CoverageSchedule> for ScheduleRecord {
    fn from(schedule: CoverageSchedule) -> Self {
        let hours = |idx: usize| {
            let h = schedule.days[idx];
            Some(HoursRecord {
                start: h.start as f64 / SECONDS_PER_HOUR,
                end: h.end as f64 / SECONDS_PER_HOUR,
            })
        };
        ScheduleRecord {
            sunday: hours(0),
            monday: hours(1),
            tuesday: hours(2),
            wednesday: hours(3),
            thursday: hours(4),
            friday: hours(5),
            saturday: hours(6),
            name: schedule.name,
            description: schedule.description,
        }
    }
}
