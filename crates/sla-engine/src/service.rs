//! Per-context deadline resolution.
//!
//! The embedding system decides which coverage windows and holidays apply
//! to a given context (a ticket, a contract, a customer). It exposes that
//! through [`CoverageLookup`] and [`HolidayLookup`], and [`SlaService`]
//! combines them with a [`DeadlineCalculator`].

use chrono::DateTime;
use chrono_tz::Tz;

use crate::deadline::DeadlineCalculator;
use crate::error::Result;
use crate::holidays::HolidaySet;
use crate::schedule::CoverageSchedule;

/// Coverage windows applicable to a context. May return zero, one or many.
pub trait CoverageLookup<C: ?Sized> {
    fn coverage_for(&self, ctx: &C) -> Vec<CoverageSchedule>;
}

/// Holidays applicable to a context.
pub trait HolidayLookup<C: ?Sized> {
    fn holidays_for(&self, ctx: &C) -> HolidaySet;
}

/// The same coverage and holidays for every context.
#[derive(Debug, Clone, Default)]
pub struct StaticCalendar {
    pub coverage: Vec<CoverageSchedule>,
    pub holidays: HolidaySet,
}

impl StaticCalendar {
    pub fn new(coverage: Vec<CoverageSchedule>, holidays: HolidaySet) -> Self {
        Self { coverage, holidays }
    }
}

impl<C: ?Sized> CoverageLookup<C> for StaticCalendar {
    fn coverage_for(&self, _ctx: &C) -> Vec<CoverageSchedule> {
        self.coverage.clone()
    }
}

impl<C: ?Sized> HolidayLookup<C> for StaticCalendar {
    fn holidays_for(&self, _ctx: &C) -> HolidaySet {
        self.holidays.clone()
    }
}

impl<C: ?Sized, F> CoverageLookup<C> for F
where
    F: Fn(&C) -> Vec<CoverageSchedule>,
{
    fn coverage_for(&self, ctx: &C) -> Vec<CoverageSchedule> {
        self(ctx)
    }
}

/// Deadline computation bound to a calculator and its lookups.
pub struct SlaService<L, H> {
    calculator: Box<dyn DeadlineCalculator>,
    coverage: L,
    holidays: H,
}

impl<L, H> SlaService<L, H> {
    pub fn new(calculator: Box<dyn DeadlineCalculator>, coverage: L, holidays: H) -> Self {
        Self {
            calculator,
            coverage,
            holidays,
        }
    }

    /// Deadline for `ctx`: `duration_seconds` of open time after `start`.
    pub fn deadline_for<C: ?Sized>(
        &self,
        ctx: &C,
        duration_seconds: u64,
        start: DateTime<Tz>,
    ) -> Result<DateTime<Tz>>
    where
        L: CoverageLookup<C>,
        H: HolidayLookup<C>,
    {
        let schedules = self.coverage.coverage_for(ctx);
        let holidays = self.holidays.holidays_for(ctx);
        tracing::debug!(
            schedules = schedules.len(),
            holidays = holidays.len(),
            duration_seconds,
            %start,
            "computing deadline"
        );
        self.calculator
            .deadline(start, duration_seconds, &schedules, &holidays)
    }
}
