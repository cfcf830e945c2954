use std::sync::{PoisonError, RwLock};

use chrono::NaiveDate;

use crate::types::{EmployeeId, ShiftCode, YearMonth};

use super::{DateWindow, MonthBatch, MonthSource, SourceError, SourceResult};

/// Roster held in memory, filtered per month on fetch.
///
/// Holds every record regardless of month; `fetch_month` returns what
/// overlaps the requested window.
#[derive(Debug, Default)]
pub struct InMemorySource {
    data: RwLock<MonthBatch>,
}

impl InMemorySource {
    /// Source serving `data`.
    pub fn new(data: MonthBatch) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Parses the same JSON layout as [`MonthBatch`].
    pub fn from_json_str(json: &str) -> SourceResult<Self> {
        let data: MonthBatch = serde_json::from_str(json)?;
        Ok(Self::new(data))
    }

    /// Upserts one assignment, as the persistence layer would after an edit.
    pub fn record_assignment(&self, employee: EmployeeId, date: NaiveDate, shift: Option<ShiftCode>) {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        data.assignments
            .retain(|a| !(a.employee == employee && a.date == date));
        data.assignments.push(crate::core::records::Assignment {
            employee,
            date,
            shift,
        });
    }
}

impl MonthSource for InMemorySource {
    fn fetch_month(&self, month: YearMonth, window: DateWindow) -> SourceResult<MonthBatch> {
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        if data.employees.is_empty() {
            return Err(SourceError::MonthUnavailable(month));
        }

        Ok(MonthBatch {
            employees: data.employees.clone(),
            assignments: data
                .assignments
                .iter()
                .filter(|a| window.contains(a.date))
                .cloned()
                .collect(),
            locks: data
                .locks
                .iter()
                .filter(|l| window.contains(l.date))
                .cloned()
                .collect(),
            vacations: data
                .vacations
                .iter()
                .filter(|v| v.start <= month.last_day() && v.end >= month.first_day())
                .cloned()
                .collect(),
            preferred_days_off: data
                .preferred_days_off
                .iter()
                .filter(|r| month.contains(r.date))
                .cloned()
                .collect(),
            occupancy: data
                .occupancy
                .iter()
                .filter(|o| month.contains(o.date))
                .cloned()
                .collect(),
            resource_assignments: data
                .resource_assignments
                .iter()
                .filter(|r| month.contains(r.date))
                .cloned()
                .collect(),
        })
    }
}
