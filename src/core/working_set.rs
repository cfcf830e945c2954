use std::collections::BTreeMap;

use chrono::NaiveDate;
use hashbrown::HashMap;

use crate::{
    engine::record::ViolationRecord,
    persist::{DateWindow, MonthBatch},
    types::{EmployeeId, ResourceTag, ShiftCode, YearMonth},
};

use super::{
    indices::{DayKey, VecIndex},
    records::{
        CellState, DataWarning, Employee, RequestKind, RequestStatus, VacationStatus,
    },
};

/// How the current violation record was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Computation {
    /// No pass has run yet.
    Pending,
    /// Last state came from a full-month pass.
    Full,
    /// Edited incrementally since the last full pass.
    Incremental,
}

/// Mutable state of the month being edited plus read-only boundary days.
#[derive(Debug, Clone)]
pub struct MonthWorkingSet {
    month: YearMonth,
    window: DateWindow,
    employees: BTreeMap<EmployeeId, Employee>,
    assignments: HashMap<DayKey, ShiftCode>,
    locks: HashMap<DayKey, ShiftCode>,
    vacation: HashMap<DayKey, VacationStatus>,
    day_off_requests: HashMap<DayKey, (RequestStatus, RequestKind)>,
    occupancy: HashMap<(NaiveDate, ShiftCode), u32>,
    by_resource: VecIndex<ResourceTag>,
    resource_overrides: HashMap<NaiveDate, HashMap<EmployeeId, Option<ResourceTag>>>,
    violations: ViolationRecord,
    warnings: Vec<DataWarning>,
    computation: Computation,
}

impl MonthWorkingSet {
    /// Builds the working set from one loader batch.
    ///
    /// Records outside `window` are dropped; vacation intervals are expanded
    /// only over days of `month`.
    pub fn from_batch(month: YearMonth, window: DateWindow, batch: MonthBatch) -> Self {
        let mut ws = Self {
            month,
            window,
            employees: BTreeMap::new(),
            assignments: HashMap::new(),
            locks: HashMap::new(),
            vacation: HashMap::new(),
            day_off_requests: HashMap::new(),
            occupancy: HashMap::new(),
            by_resource: HashMap::new(),
            resource_overrides: HashMap::new(),
            violations: ViolationRecord::default(),
            warnings: Vec::new(),
            computation: Computation::Pending,
        };

        for employee in batch.employees {
            if let Some(tag) = &employee.resource {
                ws.by_resource
                    .entry(tag.clone())
                    .or_default()
                    .push(employee.id);
            }
            ws.employees.insert(employee.id, employee);
        }

        for a in batch.assignments {
            if !window.contains(a.date) {
                continue;
            }
            if let Some(code) = a.shift.filter(|c| !c.is_empty()) {
                ws.assignments.insert((a.employee, a.date), code);
            }
        }

        for lock in batch.locks {
            if window.contains(lock.date) {
                ws.locks.insert((lock.employee, lock.date), lock.shift);
            }
        }

        for v in batch.vacations {
            let start = v.start.max(month.first_day());
            let end = v.end.min(month.last_day());
            for day in start.iter_days().take_while(|d| *d <= end) {
                let slot = ws.vacation.entry((v.employee, day)).or_insert(v.status);
                if v.status == VacationStatus::Approved {
                    *slot = VacationStatus::Approved;
                }
            }
        }

        for req in batch.preferred_days_off {
            if month.contains(req.date) {
                ws.day_off_requests
                    .insert((req.employee, req.date), (req.status, req.kind));
            }
        }

        for occ in batch.occupancy {
            ws.occupancy.insert((occ.date, occ.shift), occ.count);
        }

        for r in batch.resource_assignments {
            if month.contains(r.date) {
                ws.resource_overrides
                    .entry(r.date)
                    .or_default()
                    .insert(r.employee, r.resource);
            }
        }

        ws
    }

    /// Month being edited.
    pub fn month(&self) -> YearMonth {
        self.month
    }

    /// Resident date range including boundary days.
    pub fn window(&self) -> DateWindow {
        self.window
    }

    /// Roster entry for `id`.
    pub fn employee(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.get(&id)
    }

    /// True when `id` is on the roster.
    pub fn has_employee(&self, id: EmployeeId) -> bool {
        self.employees.contains_key(&id)
    }

    /// Roster in id order.
    pub fn employee_ids(&self) -> impl Iterator<Item = EmployeeId> + '_ {
        self.employees.keys().copied()
    }

    /// Raw assigned shift, ignoring vacation and requests.
    pub fn shift_at(&self, employee: EmployeeId, date: NaiveDate) -> Option<&ShiftCode> {
        self.assignments.get(&(employee, date))
    }

    /// Pinned shift, if an administrator locked the cell.
    pub fn lock_at(&self, employee: EmployeeId, date: NaiveDate) -> Option<&ShiftCode> {
        self.locks.get(&(employee, date))
    }

    /// Vacation status covering the cell, approved entries winning.
    pub fn vacation_status(&self, employee: EmployeeId, date: NaiveDate) -> Option<VacationStatus> {
        self.vacation.get(&(employee, date)).copied()
    }

    /// Preferred-day-off request for the cell.
    pub fn day_off_request(
        &self,
        employee: EmployeeId,
        date: NaiveDate,
    ) -> Option<(RequestStatus, RequestKind)> {
        self.day_off_requests.get(&(employee, date)).copied()
    }

    /// Loader-supplied head count; never recomputed here.
    pub fn occupancy(&self, date: NaiveDate, shift: &str) -> u32 {
        self.occupancy
            .get(&(date, shift.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Effective classification of a cell.
    pub fn state_at(&self, employee: EmployeeId, date: NaiveDate) -> CellState {
        if self.vacation_status(employee, date) == Some(VacationStatus::Approved) {
            return CellState::Vacation;
        }
        if let Some((status, RequestKind::DayOff)) = self.day_off_request(employee, date) {
            if status.is_granted() {
                return CellState::DayOff;
            }
        }
        match self.shift_at(employee, date) {
            Some(code) => CellState::Shift(code.clone()),
            None => CellState::Free,
        }
    }

    /// Resource handled by `employee` on `date`, honoring per-day overrides.
    pub fn resource_on(&self, employee: EmployeeId, date: NaiveDate) -> Option<&ResourceTag> {
        if let Some(over) = self
            .resource_overrides
            .get(&date)
            .and_then(|day| day.get(&employee))
        {
            return over.as_ref();
        }
        self.employees.get(&employee)?.resource.as_ref()
    }

    /// Employees handling `tag` on `date`, in id order.
    pub fn holders(&self, tag: &str, date: NaiveDate) -> Vec<EmployeeId> {
        let overrides = self.resource_overrides.get(&date);
        let mut out: Vec<EmployeeId> = self
            .by_resource
            .get(tag)
            .into_iter()
            .flatten()
            .copied()
            .filter(|id| overrides.is_none_or(|day| !day.contains_key(id)))
            .collect();
        if let Some(day) = overrides {
            out.extend(
                day.iter()
                    .filter(|(_, r)| r.as_deref() == Some(tag))
                    .map(|(id, _)| *id),
            );
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Current violation record.
    pub fn violations(&self) -> &ViolationRecord {
        &self.violations
    }

    /// Warnings from the last full pass.
    pub fn warnings(&self) -> &[DataWarning] {
        &self.warnings
    }

    /// How the current record was produced.
    pub fn computation(&self) -> Computation {
        self.computation
    }

    pub(crate) fn set_shift(
        &mut self,
        employee: EmployeeId,
        date: NaiveDate,
        shift: Option<ShiftCode>,
    ) -> Option<ShiftCode> {
        match shift.filter(|c| !c.is_empty()) {
            Some(code) => self.assignments.insert((employee, date), code),
            None => self.assignments.remove(&(employee, date)),
        }
    }

    pub(crate) fn set_resource(
        &mut self,
        employee: EmployeeId,
        date: NaiveDate,
        resource: Option<ResourceTag>,
    ) {
        self.resource_overrides
            .entry(date)
            .or_default()
            .insert(employee, resource);
    }

    /// Assignments with their keys, boundary days included.
    pub(crate) fn assignments(&self) -> impl Iterator<Item = (&DayKey, &ShiftCode)> {
        self.assignments.iter()
    }

    pub(crate) fn violations_mut(&mut self) -> &mut ViolationRecord {
        &mut self.violations
    }

    pub(crate) fn finish_full_pass(&mut self, record: ViolationRecord, warnings: Vec<DataWarning>) {
        self.violations = record;
        self.warnings = warnings;
        self.computation = Computation::Full;
    }

    pub(crate) fn mark_incremental(&mut self) {
        self.computation = Computation::Incremental;
    }
}
