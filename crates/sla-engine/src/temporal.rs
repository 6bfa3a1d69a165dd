//! Local-calendar helpers shared by the interval walk and its callers.
//!
//! All deadline arithmetic happens in one IANA timezone so that "day
//! boundaries" match local midnight. These helpers parse caller input
//! (timezone names, instants, compact durations) and provide the
//! primitives the walk needs: wall-clock offsets from a calendar date's
//! midnight, and elapsed-second shifts of an instant.
//!
//! # DST
//!
//! Schedule offsets are wall-clock times: 09:00 is 09:00 local time even on
//! a transition day. The elapsed length of a window spanning a transition
//! is therefore off by the shift (a 00:00-06:00 window lasts 5 h on a
//! spring-forward night). No compensation is applied.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, SlaError};

/// Naive datetime layouts accepted by [`parse_instant`] when the input
/// carries no offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse an IANA timezone string into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| SlaError::InvalidTimezone(format!("'{}'", s)))
}

/// Parse an instant and express it in `tz`.
///
/// Accepts RFC 3339 (`2026-03-16T09:00:00Z`, `2026-03-16T09:00:00+01:00`)
/// or a naive local datetime (`2026-03-16T09:00`), which is interpreted as
/// wall-clock time in `tz`. Ambiguous local times (DST fall-back) resolve to
/// the earlier instant; nonexistent ones (DST gap) are rejected.
pub fn parse_instant(s: &str, tz: &Tz) -> Result<DateTime<Tz>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(tz));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| {
            SlaError::InvalidDatetime(format!(
                "'{s}': expected RFC 3339 or YYYY-MM-DDTHH:MM[:SS]"
            ))
        })?;

    tz.from_local_datetime(&naive).earliest().ok_or_else(|| {
        SlaError::InvalidDatetime(format!("'{s}' does not exist in {}", tz.name()))
    })
}

/// Local midnight of `date` in `tz`.
///
/// When a DST transition skips midnight (e.g. America/Santiago), the first
/// valid local minute after it is used instead.
pub fn local_midnight(date: NaiveDate, tz: &Tz) -> Result<DateTime<Tz>> {
    local_wall_clock(date, 0, tz)
}

/// The instant whose local wall-clock time is `seconds` after midnight of
/// `date` in `tz`. Offsets past 24 h land on the following days.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant. Times
/// skipped by a DST gap resolve to the first valid local minute after them.
pub fn local_wall_clock(date: NaiveDate, seconds: i64, tz: &Tz) -> Result<DateTime<Tz>> {
    let naive = TimeDelta::try_seconds(seconds)
        .and_then(|delta| date.and_time(NaiveTime::MIN).checked_add_signed(delta))
        .ok_or_else(|| {
            SlaError::InvalidDatetime(format!("{seconds}s after {date} is out of range"))
        })?;
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => (1..=24 * 60)
            .map(|m| naive + TimeDelta::minutes(m))
            .find_map(|n| tz.from_local_datetime(&n).earliest())
            .ok_or_else(|| {
                SlaError::InvalidDatetime(format!("no valid local time after {naive} in {}", tz.name()))
            }),
    }
}

/// `instant + seconds` (seconds may be negative), failing on overflow.
pub fn shift<T: TimeZone>(instant: &DateTime<T>, seconds: i64) -> Result<DateTime<T>> {
    TimeDelta::try_seconds(seconds)
        .and_then(|delta| instant.clone().checked_add_signed(delta))
        .ok_or_else(|| {
            SlaError::InvalidDuration(format!("{seconds}s from {} is out of range", instant.with_timezone(&Utc)))
        })
}

/// Whole seconds from `from` to `to` (negative if `to` is earlier).
pub fn seconds_between<T: TimeZone>(from: &DateTime<T>, to: &DateTime<T>) -> i64 {
    (to.clone() - from.clone()).num_seconds()
}

/// Parse a non-negative duration into seconds.
///
/// Accepts a bare integer (`"3600"`, seconds) or one or more unit
/// components: `Nw`, `Nd`, `Nh`, `Nm`, `Ns` (e.g. `"8h"`, `"1d2h30m"`).
/// Days and weeks are plain multiples of 24 h of *open* time, not calendar days.
pub fn parse_duration_seconds(s: &str) -> Result<u64> {
    let s = s.trim();
    if s.is_empty() {
        return Err(SlaError::InvalidDuration("empty duration".to_string()));
    }
    if let Ok(n) = s.parse::<u64>() {
        return Ok(n);
    }

    let mut total: u64 = 0;
    let mut num_buf = String::new();
    let mut found_any = false;

    for ch in s.chars() {
        if ch.is_ascii_digit() {
            num_buf.push(ch);
            continue;
        }
        if num_buf.is_empty() {
            return Err(SlaError::InvalidDuration(format!(
                "expected number before '{ch}' in '{s}'"
            )));
        }
        let n: u64 = num_buf
            .parse()
            .map_err(|_| SlaError::InvalidDuration(format!("invalid number in '{s}'")))?;
        num_buf.clear();
        found_any = true;

        let unit = match ch {
            'w' | 'W' => 7 * 86_400,
            'd' | 'D' => 86_400,
            'h' | 'H' => 3_600,
            'm' | 'M' => 60,
            's' | 'S' => 1,
            _ => {
                return Err(SlaError::InvalidDuration(format!(
                    "unknown unit '{ch}' in '{s}'"
                )));
            }
        };
        total = n
            .checked_mul(unit)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(|| SlaError::InvalidDuration(format!("'{s}' overflows")))?;
    }

    // Trailing number without unit
    if !num_buf.is_empty() {
        return Err(SlaError::InvalidDuration(format!(
            "number without unit at end of '{s}'"
        )));
    }
    if !found_any {
        return Err(SlaError::InvalidDuration(format!(
            "no valid components in '{s}'"
        )));
    }

    Ok(total)
}

/// Format seconds as e.g. "2 days, 3 hours, 15 minutes".
pub fn format_human_duration(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    let plural = |n: u64, unit: &str| format!("{n} {unit}{}", if n == 1 { "" } else { "s" });

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(plural(days, "day"));
    }
    if hours > 0 {
        parts.push(plural(hours, "hour"));
    }
    if minutes > 0 {
        parts.push(plural(minutes, "minute"));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(plural(seconds, "second"));
    }
    parts.join(", ")
}
