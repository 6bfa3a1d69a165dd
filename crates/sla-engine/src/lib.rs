//! # sla-engine
//!
//! Deterministic SLA deadline computation.
//!
//! Given a start instant, a duration of *open* time, the weekly coverage
//! windows that apply and a set of holidays, the engine computes the instant
//! at which that much open time has elapsed. Computation is pure: no clock,
//! no I/O, safe to share across threads.
//!
//! ## Modules
//!
//! - [`deadline`] — The interval walk, multi-schedule resolution and the [`DeadlineCalculator`] trait
//! - [`interval`] — Open interval resolution for a reference instant
//! - [`schedule`] — Weekly coverage windows (one open interval per weekday)
//! - [`holidays`] — Closed calendar dates
//! - [`config`] — Calculator settings and JSON calendar documents
//! - [`service`] — Per-context lookups of coverage and holidays
//! - [`temporal`] — Local-midnight arithmetic and input parsing
//! - [`error`] — Error types
//!
//! ## Example
//!
//! ```
//! use sla_engine::{compute_deadline, CoverageSchedule, DeadlineOptions, HolidaySet, OpenHours};
//! use sla_engine::temporal::parse_instant;
//!
//! let tz = chrono_tz::Europe::Paris;
//! let office = CoverageSchedule::weekdays("office", OpenHours::from_hours(9.0, 17.0).unwrap());
//! let start = parse_instant("2026-03-16T09:00", &tz).unwrap(); // a Monday
//!
//! let deadline = compute_deadline(&start, 10 * 3600, &[office], &HolidaySet::new(), &DeadlineOptions::default()).unwrap();
//! assert_eq!(deadline, parse_instant("2026-03-17T11:00", &tz).unwrap());
//! ```

pub mod config;
pub mod deadline;
pub mod error;
pub mod holidays;
pub mod interval;
pub mod schedule;
pub mod service;
pub mod temporal;

pub use config::{CalculatorConfig, CalendarFile};
pub use deadline::{
    compute_deadline, compute_deadline_for_schedule, AlwaysOpenCalculator,
    BusinessHoursCalculator, DeadlineCalculator, DeadlineOptions, SchedulePolicy, WalkLimit,
    LEGACY_INTERVAL_CAP,
};
pub use error::SlaError;
pub use holidays::{Holiday, HolidaySet};
pub use interval::{next_open_interval, open_intervals, Interval, OpenInterval};
pub use schedule::{CoverageSchedule, OpenHours};
pub use service::{CoverageLookup, HolidayLookup, SlaService, StaticCalendar};
