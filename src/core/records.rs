//! Roster records as delivered by the persistence collaborator.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{EmployeeId, ResourceTag, ShiftCode};

/// Employee row with its default shared-resource tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Stable identifier.
    pub id: EmployeeId,
    /// Display name.
    pub name: String,
    /// Resource the employee handles, if any.
    #[serde(default)]
    pub resource: Option<ResourceTag>,
}

/// One roster cell. `shift: None` and a missing row both mean free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned employee.
    pub employee: EmployeeId,
    /// Calendar date.
    pub date: NaiveDate,
    /// Shift abbreviation.
    #[serde(default)]
    pub shift: Option<ShiftCode>,
}

/// Administrator pin of a cell to a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockInfo {
    /// Pinned employee.
    pub employee: EmployeeId,
    /// Pinned date.
    pub date: NaiveDate,
    /// Shift the cell is pinned to.
    pub shift: ShiftCode,
}

/// Approval state of a vacation interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VacationStatus {
    /// Counts as vacation.
    Approved,
    /// Awaiting a decision.
    Pending,
    /// Declined.
    Rejected,
    /// Any status this engine does not interpret.
    #[serde(other)]
    Other,
}

/// Vacation request covering `start..=end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationInterval {
    /// Requesting employee.
    pub employee: EmployeeId,
    /// First vacation day.
    pub start: NaiveDate,
    /// Last vacation day.
    pub end: NaiveDate,
    /// Approval state.
    pub status: VacationStatus,
}

/// Approval state of a preferred-day-off request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Approved by an administrator.
    Approved,
    /// Accepted by the planner.
    Accepted,
    /// Awaiting a decision.
    Pending,
    /// Declined.
    Rejected,
    /// Any status this engine does not interpret.
    #[serde(other)]
    Other,
}

impl RequestStatus {
    /// Approved and accepted requests take effect.
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Approved | Self::Accepted)
    }
}

/// What the employee asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    /// A whole day off.
    DayOff,
    /// Any other wish, e.g. a preferred shift.
    #[serde(other)]
    Other,
}

/// Preferred-day-off request for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferredDayOffRequest {
    /// Requesting employee.
    pub employee: EmployeeId,
    /// Requested date.
    pub date: NaiveDate,
    /// Approval state.
    pub status: RequestStatus,
    /// Requested kind.
    pub kind: RequestKind,
}

/// Externally computed head count for one shift on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyCount {
    /// Calendar date.
    pub date: NaiveDate,
    /// Shift abbreviation.
    pub shift: ShiftCode,
    /// Number of employees on that shift.
    pub count: u32,
}

/// Per-day override of an employee's resource tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAssignment {
    /// Affected employee.
    pub employee: EmployeeId,
    /// Affected date.
    pub date: NaiveDate,
    /// Resource handled that day; `None` releases the default one.
    #[serde(default)]
    pub resource: Option<ResourceTag>,
}

/// Classification of a cell after vacation and day-off requests apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellState {
    /// Nothing assigned.
    Free,
    /// Approved vacation.
    Vacation,
    /// Granted preferred day off.
    DayOff,
    /// Assigned shift.
    Shift(ShiftCode),
}

/// Data-quality finding surfaced to the caller instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DataWarning {
    /// Assignment for an employee missing from the roster.
    UnknownEmployee {
        /// Referenced employee.
        employee: EmployeeId,
        /// Assignment date.
        date: NaiveDate,
    },
    /// Assignment using a shift code missing from the catalog.
    UnknownShift {
        /// Assigned employee.
        employee: EmployeeId,
        /// Assignment date.
        date: NaiveDate,
        /// Unknown code.
        code: ShiftCode,
    },
    /// Catalog entry without start or end time.
    MissingShiftTimes {
        /// Affected code.
        code: ShiftCode,
    },
}

impl fmt::Display for DataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEmployee { employee, date } => {
                write!(f, "assignment on {date} references unknown employee {employee}")
            }
            Self::UnknownShift {
                employee,
                date,
                code,
            } => write!(f, "employee {employee} on {date} has unknown shift {code:?}"),
            Self::MissingShiftTimes { code } => write!(f, "shift {code:?} has no time data"),
        }
    }
}
