//! Calculator configuration and calendar documents.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::deadline::{DeadlineOptions, SchedulePolicy, WalkLimit};
use crate::error::{Result, SlaError};
use crate::holidays::HolidaySet;
use crate::schedule::CoverageSchedule;

/// Settings for a [`BusinessHoursCalculator`](crate::BusinessHoursCalculator).
///
/// ```json
/// { "timezone": "Europe/Paris", "policy": "strict", "walk_limit": { "fixed": 20 } }
/// ```
///
/// Every field is optional: UTC, earliest-wins, derived walk limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Timezone whose local midnight delimits calendar days.
    pub timezone: Tz,
    #[serde(flatten)]
    pub options: DeadlineOptions,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            options: DeadlineOptions::default(),
        }
    }
}

impl CalculatorConfig {
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_policy(mut self, policy: SchedulePolicy) -> Self {
        self.options.policy = policy;
        self
    }

    pub fn with_walk_limit(mut self, walk_limit: WalkLimit) -> Self {
        self.options.walk_limit = walk_limit;
        self
    }
}

/// A self-contained calendar: calculator settings, coverage windows and
/// holidays in one JSON document.
///
/// ```json
/// {
///   "timezone": "Europe/Paris",
///   "coverage": [{ "name": "office", "monday": { "start": 9, "end": 17 }, ... }],
///   "holidays": ["2026-12-25", { "name": "New Year", "date": "2027-01-01" }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarFile {
    #[serde(flatten)]
    pub config: CalculatorConfig,
    #[serde(default)]
    pub coverage: Vec<CoverageSchedule>,
    #[serde(default)]
    pub holidays: HolidaySet,
}

impl CalendarFile {
    /// Parse a calendar document, validating every schedule.
    ///
    /// # Errors
    ///
    /// [`SlaError::InvalidSchedule`] for any malformed document, including
    /// unknown timezones and schedules missing a weekday.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SlaError::InvalidSchedule(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use serde_json::json;

    fn week_json() -> serde_json::Value {
        let mut s = json!({"name": "office"});
        for day in crate::schedule::WEEKDAY_NAMES {
            s[day] = json!({"start": 9, "end": 17});
        }
        s["saturday"] = json!({"start": 0, "end": 0});
        s["sunday"] = json!({"start": 0, "end": 0});
        s
    }

    #[test]
    fn test_default_config() {
        let c: CalculatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(c, CalculatorConfig::default());
        assert_eq!(c.timezone, Tz::UTC);
        assert_eq!(c.options.policy, SchedulePolicy::EarliestWins);
        assert_eq!(c.options.walk_limit, WalkLimit::Derived);
    }

    #[test]
    fn test_config_all_fields() {
        let c: CalculatorConfig = serde_json::from_value(json!({
            "timezone": "America/New_York",
            "policy": "strict",
            "walk_limit": {"fixed": 20}
        }))
        .unwrap();
        assert_eq!(c.timezone, chrono_tz::America::New_York);
        assert_eq!(c.options.policy, SchedulePolicy::Strict);
        assert_eq!(c.options.walk_limit, WalkLimit::Fixed(20));
    }

    #[test]
    fn test_config_builders() {
        let c = CalculatorConfig::default()
            .with_timezone(chrono_tz::Asia::Tokyo)
            .with_policy(SchedulePolicy::Strict)
            .with_walk_limit(WalkLimit::Fixed(5));
        assert_eq!(c.timezone, chrono_tz::Asia::Tokyo);
        assert_eq!(c.options.walk_limit, WalkLimit::Fixed(5));
    }

    #[test]
    fn test_calendar_file_parses() {
        let doc = json!({
            "timezone": "Europe/Paris",
            "coverage": [week_json()],
            "holidays": ["2026-12-25", {"name": "New Year", "date": "2027-01-01"}]
        });
        let cal = CalendarFile::from_json(&doc.to_string()).unwrap();
        assert_eq!(cal.config.timezone, chrono_tz::Europe::Paris);
        assert_eq!(cal.coverage.len(), 1);
        assert!(cal.coverage[0].open_hours(Weekday::Sat).is_closed());
        assert_eq!(cal.holidays.len(), 2);
    }

    #[test]
    fn test_calendar_file_empty_is_24x7() {
        let cal = CalendarFile::from_json("{}").unwrap();
        assert!(cal.coverage.is_empty());
        assert!(cal.holidays.is_empty());
    }

    #[test]
    fn test_calendar_file_rejects_bad_timezone() {
        let err = CalendarFile::from_json(r#"{"timezone": "Mars/Olympus"}"#).unwrap_err();
        assert!(matches!(err, SlaError::InvalidSchedule(_)));
    }

    #[test]
    fn test_calendar_file_rejects_incomplete_schedule() {
        let doc = json!({"coverage": [{"name": "short", "monday": {"start": 9, "end": 17}}]});
        let err = CalendarFile::from_json(&doc.to_string()).unwrap_err().to_string();
        assert!(err.contains("sunday"), "got: {err}");
    }
}
