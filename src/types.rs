//! Shared primitive IDs and calendar types.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Employee identifier assigned by the persistence collaborator.
pub type EmployeeId = u32;
/// Shift-type abbreviation, e.g. `"N"` or `"T"`.
pub type ShiftCode = String;
/// Shared-resource tag, e.g. the id of one working dog.
pub type ResourceTag = String;

/// Calendar input the engine refuses to coerce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// Month outside 1..=12 or year outside the supported range.
    #[error("invalid month {year}-{month}")]
    InvalidMonth {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u32,
    },
    /// Day-of-month that does not exist in the month.
    #[error("day {day} does not exist in {month}")]
    InvalidDay {
        /// Containing month.
        month: YearMonth,
        /// Requested day.
        day: u32,
    },
    /// Date that is not part of the month being edited.
    #[error("{date} is outside {month}")]
    DateOutsideMonth {
        /// Month currently loaded.
        month: YearMonth,
        /// Offending date.
        date: NaiveDate,
    },
}

/// A validated calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
    #[serde(skip)]
    first: NaiveDate,
    #[serde(skip)]
    last: NaiveDate,
}

impl YearMonth {
    /// Validates `month` in 1..=12 and that every day of it is representable.
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        let invalid = || CalendarError::InvalidMonth { year, month };
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or_else(invalid)?;
        Ok(Self {
            year,
            month,
            first,
            last,
        })
    }

    /// Calendar year.
    pub fn year(self) -> i32 {
        self.year
    }

    /// Month number, 1-based.
    pub fn month(self) -> u32 {
        self.month
    }

    /// First day of the month.
    pub fn first_day(self) -> NaiveDate {
        self.first
    }

    /// Last day of the month.
    pub fn last_day(self) -> NaiveDate {
        self.last
    }

    /// Number of days in the month.
    pub fn len_days(self) -> u32 {
        self.last.day()
    }

    /// True when `date` falls inside this month.
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Date for a day-of-month.
    pub fn date(self, day: u32) -> Result<NaiveDate, CalendarError> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
            .ok_or(CalendarError::InvalidDay { month: self, day })
    }

    /// Rejects dates outside this month.
    pub fn ensure_contains(self, date: NaiveDate) -> Result<(), CalendarError> {
        if self.contains(date) {
            Ok(())
        } else {
            Err(CalendarError::DateOutsideMonth { month: self, date })
        }
    }

    /// Every day of the month in order.
    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        self.first_day()
            .iter_days()
            .take(self.len_days() as usize)
    }

    /// Saturday/Sunday pairs with both days inside the month.
    pub fn complete_weekends(self) -> Vec<(NaiveDate, NaiveDate)> {
        self.days()
            .filter(|d| d.weekday() == Weekday::Sat)
            .filter_map(|sat| {
                let sun = sat.succ_opt()?;
                self.contains(sun).then_some((sat, sun))
            })
            .collect()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One roster cell of the current month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Employee owning the row.
    pub employee: EmployeeId,
    /// Day of month, 1-based.
    pub day: u32,
}

impl Cell {
    /// Cell for `employee` on `date`.
    pub fn at(employee: EmployeeId, date: NaiveDate) -> Self {
        Self {
            employee,
            day: date.day(),
        }
    }
}
