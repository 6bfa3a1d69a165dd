use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use sla_engine::temporal::{format_human_duration, parse_duration_seconds, parse_instant, parse_timezone};
use sla_engine::{
    open_intervals, BusinessHoursCalculator, CalendarFile, DeadlineCalculator, SchedulePolicy,
    SlaError, WalkLimit,
};

#[derive(Parser)]
#[command(
    name = "sla",
    version,
    about = "Compute SLA deadlines from coverage windows and holidays"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the instant at which DURATION of open time has elapsed
    Deadline {
        /// Calendar document (JSON). Without one the calendar is open 24x7
        #[arg(short, long)]
        calendar: Option<PathBuf>,
        /// Start instant: RFC 3339, or local YYYY-MM-DDTHH:MM[:SS]
        #[arg(short, long)]
        start: String,
        /// Open time to accumulate: seconds, or e.g. 8h, 1d2h30m
        #[arg(short, long)]
        duration: String,
        /// Override the calendar's timezone
        #[arg(long)]
        timezone: Option<String>,
        /// Fail if more than one coverage window applies
        #[arg(long)]
        strict: bool,
        /// Resolve at most N intervals per window instead of a derived bound
        #[arg(long, value_name = "N")]
        max_intervals: Option<u32>,
    },
    /// List the open intervals following an instant
    Intervals {
        /// Calendar document (JSON)
        #[arg(short, long)]
        calendar: PathBuf,
        /// Start instant: RFC 3339, or local YYYY-MM-DDTHH:MM[:SS]
        #[arg(short, long)]
        start: String,
        /// Number of intervals to list
        #[arg(short = 'n', long, default_value_t = 7)]
        count: usize,
        /// Coverage window to walk, by name (default: the first)
        #[arg(short, long)]
        window: Option<String>,
    },
    /// Check a calendar document and summarize it
    Validate {
        /// Calendar document (JSON)
        #[arg(short, long)]
        calendar: PathBuf,
        /// Fail if the document defines more than one coverage window
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Serialize)]
struct DeadlineReport {
    deadline: String,
    deadline_utc: String,
    timezone: String,
    duration_seconds: u64,
    duration: String,
    schedules: usize,
}

#[derive(Serialize)]
struct IntervalReport {
    start: String,
    end: String,
    open_seconds: i64,
}

#[derive(Serialize)]
struct WindowSummary {
    name: String,
    weekly_open_hours: f64,
}

#[derive(Serialize)]
struct ValidationReport {
    timezone: String,
    policy: SchedulePolicy,
    windows: Vec<WindowSummary>,
    holidays: usize,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Deadline {
            calendar,
            start,
            duration,
            timezone,
            strict,
            max_intervals,
        } => {
            let mut cal = match calendar {
                Some(path) => load_calendar(&path)?,
                None => CalendarFile::default(),
            };
            if let Some(tz) = timezone {
                cal.config.timezone = parse_timezone(&tz)?;
            }
            if strict {
                cal.config.options.policy = SchedulePolicy::Strict;
            }
            if let Some(n) = max_intervals {
                cal.config.options.walk_limit = WalkLimit::Fixed(n);
            }

            let tz = cal.config.timezone;
            let start = parse_instant(&start, &tz)?;
            let duration_seconds = parse_duration_seconds(&duration)?;

            let calculator = BusinessHoursCalculator::new(cal.config.clone());
            let deadline = calculator
                .deadline(start, duration_seconds, &cal.coverage, &cal.holidays)
                .context("failed to compute deadline")?;
            tracing::info!(%start, %deadline, duration_seconds, "deadline computed");

            print_json(&DeadlineReport {
                deadline: deadline.to_rfc3339(),
                deadline_utc: deadline.with_timezone(&Utc).to_rfc3339(),
                timezone: tz.name().to_string(),
                duration_seconds,
                duration: format_human_duration(duration_seconds),
                schedules: cal.coverage.len(),
            })
        }
        Commands::Intervals {
            calendar,
            start,
            count,
            window,
        } => {
            let cal = load_calendar(&calendar)?;
            let schedule = match &window {
                Some(name) => cal
                    .coverage
                    .iter()
                    .find(|s| s.name() == name)
                    .with_context(|| format!("no coverage window named '{name}'"))?,
                None => cal
                    .coverage
                    .first()
                    .context("calendar has no coverage window: it is open 24x7")?,
            };

            let start = parse_instant(&start, &cal.config.timezone)?;
            let intervals = open_intervals(start, &cal.holidays, schedule)
                .take(count)
                .map(|r| r.map(|i| interval_report(&i.start, &i.end, i.duration_seconds())))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            print_json(&intervals)
        }
        Commands::Validate { calendar, strict } => {
            let cal = load_calendar(&calendar)?;
            if strict && cal.coverage.len() > 1 {
                return Err(SlaError::MultipleSchedules {
                    count: cal.coverage.len(),
                }
                .into());
            }
            let policy = if strict {
                SchedulePolicy::Strict
            } else {
                cal.config.options.policy
            };

            print_json(&ValidationReport {
                timezone: cal.config.timezone.name().to_string(),
                policy,
                windows: cal
                    .coverage
                    .iter()
                    .map(|s| WindowSummary {
                        name: s.name().to_string(),
                        weekly_open_hours: s.weekly_open_seconds() as f64 / 3_600.0,
                    })
                    .collect(),
                holidays: cal.holidays.len(),
            })
        }
    }
}

fn load_calendar(path: &Path) -> Result<CalendarFile> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read calendar {}", path.display()))?;
    let cal = CalendarFile::from_json(&json)
        .with_context(|| format!("invalid calendar {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        windows = cal.coverage.len(),
        holidays = cal.holidays.len(),
        "calendar loaded"
    );
    Ok(cal)
}

fn interval_report(start: &DateTime<Tz>, end: &DateTime<Tz>, open_seconds: i64) -> IntervalReport {
    IntervalReport {
        start: start.to_rfc3339(),
        end: end.to_rfc3339(),
        open_seconds,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{out}");
    Ok(())
}
