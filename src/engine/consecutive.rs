use chrono::NaiveDate;

use crate::types::EmployeeId;

use super::{reason::ViolationReason, traits::RuleContext};

/// Ceiling on consecutive work days, checked on demand only.
#[derive(Debug, Clone, Copy)]
pub struct ConsecutiveLimit {
    /// Largest allowed run of work days.
    pub ceiling: u32,
}

impl ConsecutiveLimit {
    /// Work days directly before `date`, walking back over resident days.
    pub fn run_before(ctx: &RuleContext<'_>, employee: EmployeeId, date: NaiveDate) -> u32 {
        let window = ctx.ws.window();
        let mut run = 0;
        let mut day = date.pred_opt();
        while let Some(d) = day {
            if !window.contains(d) || !ctx.is_working(employee, d) {
                break;
            }
            run += 1;
            day = d.pred_opt();
        }
        run
    }

    /// Rejects a work shift once the preceding run has reached the ceiling.
    pub fn check(
        &self,
        ctx: &RuleContext<'_>,
        employee: EmployeeId,
        date: NaiveDate,
        candidate: Option<&str>,
    ) -> Option<ViolationReason> {
        if !candidate.is_some_and(|code| ctx.catalog.is_work(code)) {
            return None;
        }
        let run = Self::run_before(ctx, employee, date);
        (run >= self.ceiling).then_some(ViolationReason::ConsecutiveLimit {
            run,
            ceiling: self.ceiling,
        })
    }
}
