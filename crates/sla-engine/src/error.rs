//! Error types for sla-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlaError {
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Computation diverged: target duration not reached after {intervals} open intervals (holiday calendar or schedule may close every day near the start date)")]
    ComputationDiverged { intervals: u32 },

    #[error("Multiple coverage windows: found {count}, strict mode allows at most one")]
    MultipleSchedules { count: usize },

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
}

pub type Result<T> = std::result::Result<T, SlaError>;
