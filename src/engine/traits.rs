use chrono::NaiveDate;
use hashbrown::HashSet;

use crate::{
    config::EngineConfig,
    core::{records::CellState, working_set::MonthWorkingSet},
    shift::ShiftCatalog,
    types::{Cell, EmployeeId},
};

/// Rules that maintain cells in the violation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleKind {
    /// Night shift followed by an early shift.
    RestPeriod,
    /// Overlapping shifts on one shared resource.
    ResourceOverlap,
}

/// Cells a rule is evaluated over.
#[derive(Debug, Clone)]
pub enum Scope {
    /// Every roster employee on every day of the month.
    Month,
    /// A neighbourhood of an edited cell.
    Cells(HashSet<Cell>),
}

/// Read-only view shared by all checkers.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    /// Month being checked.
    pub ws: &'a MonthWorkingSet,
    /// Shift definitions.
    pub catalog: &'a ShiftCatalog,
    /// Rule parameters.
    pub config: &'a EngineConfig,
}

impl<'a> RuleContext<'a> {
    /// Shift the rules see for a cell.
    ///
    /// Vacation, granted day-off requests, unknown employees and codes
    /// missing from the catalog all read as free.
    pub fn rule_code(&self, employee: EmployeeId, date: NaiveDate) -> Option<&'a str> {
        if !self.ws.has_employee(employee) {
            return None;
        }
        match self.ws.state_at(employee, date) {
            CellState::Shift(_) => {}
            CellState::Free | CellState::Vacation | CellState::DayOff => return None,
        }
        let code = self.ws.shift_at(employee, date)?;
        self.catalog.knows(code).then_some(code.as_str())
    }

    /// True when the rules see a work-classified shift.
    pub fn is_working(&self, employee: EmployeeId, date: NaiveDate) -> bool {
        self.rule_code(employee, date)
            .is_some_and(|code| self.catalog.is_work(code))
    }

    /// Date of a cell in the current month.
    pub fn date_of(&self, cell: Cell) -> Option<NaiveDate> {
        self.ws.month().date(cell.day).ok()
    }
}

/// One cell-level rule.
///
/// `violates` must depend only on cells that `neighborhood` reports for any
/// edit touching them; the incremental path relies on it.
pub trait RuleChecker: Send + Sync {
    /// Key under which this rule stores its cells.
    fn kind(&self) -> RuleKind;

    /// Cells whose status can depend on the cell `(employee, date)`.
    fn neighborhood(&self, ctx: &RuleContext<'_>, employee: EmployeeId, date: NaiveDate) -> Vec<Cell>;

    /// True when `cell` currently breaks this rule.
    fn violates(&self, ctx: &RuleContext<'_>, cell: Cell) -> bool;
}

/// Violating cells of `rule` within `scope`.
///
/// Both the full pass and the incremental path go through here.
pub fn evaluate(rule: &dyn RuleChecker, ctx: &RuleContext<'_>, scope: &Scope) -> HashSet<Cell> {
    match scope {
        Scope::Month => {
            let days = ctx.ws.month().len_days();
            ctx.ws
                .employee_ids()
                .flat_map(|employee| (1..=days).map(move |day| Cell { employee, day }))
                .filter(|cell| rule.violates(ctx, *cell))
                .collect()
        }
        Scope::Cells(cells) => cells
            .iter()
            .copied()
            .filter(|cell| rule.violates(ctx, *cell))
            .collect(),
    }
}
