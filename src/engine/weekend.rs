use chrono::NaiveDate;

use crate::{
    core::records::CellState,
    types::{EmployeeId, YearMonth},
};

use super::traits::RuleContext;

/// Every employee keeps at least one fully free weekend per month.
#[derive(Debug, Clone)]
pub struct WeekendOffRule {
    weekends: Vec<(NaiveDate, NaiveDate)>,
}

impl WeekendOffRule {
    /// Collects the complete Saturday/Sunday pairs of `month`.
    pub fn for_month(month: YearMonth) -> Self {
        Self {
            weekends: month.complete_weekends(),
        }
    }

    /// Rule over an explicit list of Saturday/Sunday pairs.
    pub fn from_weekends(weekends: Vec<(NaiveDate, NaiveDate)>) -> Self {
        Self { weekends }
    }

    /// Number of complete weekends considered.
    pub fn weekend_count(&self) -> usize {
        self.weekends.len()
    }

    /// True when a work shift on `date` would leave no free weekend.
    ///
    /// The weekend containing `date` counts as burned; a date outside any
    /// complete weekend never changes the outcome.
    pub fn would_break_free_weekend(&self, ctx: &RuleContext<'_>, employee: EmployeeId, date: NaiveDate) -> bool {
        if self.weekends.is_empty() {
            return false;
        }
        let Some(own) = self
            .weekends
            .iter()
            .position(|(sat, sun)| *sat == date || *sun == date)
        else {
            return false;
        };

        let burned = 1 + self
            .weekends
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != own)
            .filter(|(_, (sat, sun))| {
                Self::worked(ctx, employee, *sat) || Self::worked(ctx, employee, *sun)
            })
            .count();

        burned >= self.weekends.len()
    }

    fn worked(ctx: &RuleContext<'_>, employee: EmployeeId, day: NaiveDate) -> bool {
        match ctx.ws.state_at(employee, day) {
            CellState::Shift(code) => ctx.catalog.is_work(&code),
            CellState::Free => ctx
                .ws
                .lock_at(employee, day)
                .is_some_and(|code| ctx.catalog.is_work(code)),
            CellState::Vacation | CellState::DayOff => false,
        }
    }
}
