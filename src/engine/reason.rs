use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::{EmployeeId, ResourceTag, ShiftCode};

/// Why a candidate assignment would be illegal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ViolationReason {
    /// Night shift directly followed by an early shift.
    RestPeriod {
        /// Day of the night shift.
        night: NaiveDate,
        /// Day of the early shift.
        early: NaiveDate,
    },
    /// Another handler of the same resource works an overlapping shift.
    ResourceOverlap {
        /// Shared resource.
        resource: ResourceTag,
        /// Conflicting employee.
        other: EmployeeId,
        /// Conflicting employee's shift.
        other_shift: ShiftCode,
    },
    /// Too many consecutive work days before the candidate date.
    ConsecutiveLimit {
        /// Work days directly before the candidate.
        run: u32,
        /// Configured ceiling.
        ceiling: u32,
    },
    /// The employee is barred from this shift.
    Excluded {
        /// Barred shift code.
        shift: ShiftCode,
    },
}

impl fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RestPeriod { night, early } => {
                write!(f, "rest period: night shift on {night} followed by early shift on {early}")
            }
            Self::ResourceOverlap {
                resource,
                other,
                other_shift,
            } => write!(
                f,
                "resource {resource} already used by employee {other} on overlapping shift {other_shift}"
            ),
            Self::ConsecutiveLimit { run, ceiling } => {
                write!(f, "{run} consecutive work days reach the limit of {ceiling}")
            }
            Self::Excluded { shift } => write!(f, "employee may not work shift {shift}"),
        }
    }
}
