/// JSON-loadable in-memory loader.
pub mod memory;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::EngineConfig,
    core::records::{
        Assignment, Employee, LockInfo, OccupancyCount, PreferredDayOffRequest,
        ResourceAssignment, VacationInterval,
    },
    types::{CalendarError, YearMonth},
};

/// Loader failures.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The loader has nothing for this month.
    #[error("no roster data for {0}")]
    MonthUnavailable(YearMonth),
    /// Malformed roster document.
    #[error("roster data could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    /// Backend-specific failure.
    #[error("{0}")]
    Message(String),
}

/// Result of a loader call.
pub type SourceResult<T> = Result<T, SourceError>;

/// Inclusive date range the loader must cover for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// First resident day.
    pub start: NaiveDate,
    /// Last resident day.
    pub end: NaiveDate,
}

impl DateWindow {
    /// The month plus the configured boundary days on each side.
    ///
    /// Fails when the boundary days fall outside the representable calendar.
    pub fn for_month(month: YearMonth, config: &EngineConfig) -> Result<Self, CalendarError> {
        let invalid = || CalendarError::InvalidMonth {
            year: month.year(),
            month: month.month(),
        };
        let start = month
            .first_day()
            .checked_sub_days(Days::new(u64::from(config.boundary_days_before)))
            .ok_or_else(invalid)?;
        let end = month
            .last_day()
            .checked_add_days(Days::new(u64::from(config.boundary_days_after)))
            .ok_or_else(invalid)?;
        Ok(Self { start, end })
    }

    /// True when `date` is resident.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Everything the engine needs for one month, fetched in one call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthBatch {
    /// Roster with default resource tags.
    pub employees: Vec<Employee>,
    /// Month assignments plus boundary days of the neighbouring months.
    pub assignments: Vec<Assignment>,
    /// Administrator pins inside the window.
    pub locks: Vec<LockInfo>,
    /// Intervals overlapping the month.
    pub vacations: Vec<VacationInterval>,
    /// Day-off requests for the month.
    pub preferred_days_off: Vec<PreferredDayOffRequest>,
    /// Per-shift head counts.
    pub occupancy: Vec<OccupancyCount>,
    /// Per-day resource overrides.
    pub resource_assignments: Vec<ResourceAssignment>,
}

/// Batch loader implemented by the persistence layer.
///
/// Called strictly before a working set is handed to the engine; may block.
pub trait MonthSource: Send + Sync {
    /// Fetches every record the engine needs for `month`.
    fn fetch_month(&self, month: YearMonth, window: DateWindow) -> SourceResult<MonthBatch>;
}

/// Classification of special calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Ordinary day.
    Regular,
    /// Public holiday.
    Holiday,
    /// Day with a special event.
    SpecialEvent,
}

/// Holiday and event calendar consumed by rule consumers outside the engine.
pub trait CalendarLookup: Send + Sync {
    /// True when `date` is a holiday.
    fn is_holiday(&self, date: NaiveDate) -> bool;

    /// Classification of `date`.
    fn event_kind(&self, date: NaiveDate) -> EventKind {
        if self.is_holiday(date) {
            EventKind::Holiday
        } else {
            EventKind::Regular
        }
    }
}

/// Calendar without holidays or events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl CalendarLookup for NoHolidays {
    fn is_holiday(&self, _date: NaiveDate) -> bool {
        false
    }
}
