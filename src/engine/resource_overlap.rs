use chrono::NaiveDate;

use crate::types::{Cell, EmployeeId};

use super::traits::{RuleChecker, RuleContext, RuleKind};

/// Two handlers of one shared resource on time-overlapping shifts.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResourceOverlapRule;

impl RuleChecker for ResourceOverlapRule {
    fn kind(&self) -> RuleKind {
        RuleKind::ResourceOverlap
    }

    fn neighborhood(&self, ctx: &RuleContext<'_>, employee: EmployeeId, date: NaiveDate) -> Vec<Cell> {
        if !ctx.ws.month().contains(date) {
            return Vec::new();
        }
        let mut cells = vec![Cell::at(employee, date)];
        if let Some(tag) = ctx.ws.resource_on(employee, date) {
            cells.extend(
                ctx.ws
                    .holders(tag, date)
                    .into_iter()
                    .map(|other| Cell::at(other, date)),
            );
        }
        cells
    }

    fn violates(&self, ctx: &RuleContext<'_>, cell: Cell) -> bool {
        let Some(date) = ctx.date_of(cell) else {
            return false;
        };
        let Some(tag) = ctx.ws.resource_on(cell.employee, date) else {
            return false;
        };
        let Some(code) = ctx.rule_code(cell.employee, date) else {
            return false;
        };
        ctx.ws
            .holders(tag, date)
            .into_iter()
            .filter(|other| *other != cell.employee)
            .filter_map(|other| ctx.rule_code(other, date))
            .any(|other_code| ctx.catalog.overlaps(code, other_code))
    }
}
