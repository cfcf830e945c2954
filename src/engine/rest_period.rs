use chrono::NaiveDate;

use crate::types::{Cell, EmployeeId};

use super::traits::{RuleChecker, RuleContext, RuleKind};

/// Night shift followed by an early shift on the next day.
///
/// Only adjacent day pairs are examined, so an edit can only affect the
/// edited day and its two neighbours.
#[derive(Debug, Default, Clone, Copy)]
pub struct RestPeriodRule;

impl RestPeriodRule {
    /// True when the pair `(day, day + 1)` breaks the minimum rest.
    pub fn pair_violates(ctx: &RuleContext<'_>, night: Option<&str>, next: Option<&str>) -> bool {
        night.is_some_and(|n| ctx.config.is_night(n)) && next.is_some_and(|e| ctx.config.is_early(e))
    }
}

impl RuleChecker for RestPeriodRule {
    fn kind(&self) -> RuleKind {
        RuleKind::RestPeriod
    }

    fn neighborhood(&self, ctx: &RuleContext<'_>, employee: EmployeeId, date: NaiveDate) -> Vec<Cell> {
        let month = ctx.ws.month();
        [date.pred_opt(), Some(date), date.succ_opt()]
            .into_iter()
            .flatten()
            .filter(|d| month.contains(*d))
            .map(|d| Cell::at(employee, d))
            .collect()
    }

    fn violates(&self, ctx: &RuleContext<'_>, cell: Cell) -> bool {
        let Some(date) = ctx.date_of(cell) else {
            return false;
        };
        let code = ctx.rule_code(cell.employee, date);
        let before = date.pred_opt().and_then(|d| ctx.rule_code(cell.employee, d));
        let after = date.succ_opt().and_then(|d| ctx.rule_code(cell.employee, d));
        Self::pair_violates(ctx, before, code) || Self::pair_violates(ctx, code, after)
    }
}
