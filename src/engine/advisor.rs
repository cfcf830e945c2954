use chrono::NaiveDate;

use crate::types::EmployeeId;

use super::{
    consecutive::ConsecutiveLimit, reason::ViolationReason, rest_period::RestPeriodRule,
    traits::RuleContext,
};

/// Answers "would this assignment be legal?" from resident state only.
///
/// Never mutates the working set; the candidate replaces the stored shift
/// of the subject cell for the duration of the query.
pub struct LiveConflictAdvisor<'a> {
    ctx: RuleContext<'a>,
    limit: ConsecutiveLimit,
}

impl<'a> LiveConflictAdvisor<'a> {
    /// Advisor over `ctx`, using its configured ceiling.
    pub fn new(ctx: RuleContext<'a>) -> Self {
        Self {
            ctx,
            limit: ConsecutiveLimit {
                ceiling: ctx.config.max_consecutive_workdays,
            },
        }
    }

    /// Reasons against `candidate` at `(employee, date)`; empty means legal.
    ///
    /// A code missing from the catalog reads as free, as it would once committed.
    pub fn evaluate(&self, employee: EmployeeId, date: NaiveDate, candidate: Option<&str>) -> Vec<ViolationReason> {
        let candidate = candidate.filter(|c| !c.is_empty() && self.ctx.catalog.knows(c));
        let mut reasons = Vec::new();

        reasons.extend(self.rest_period(employee, date, candidate));
        reasons.extend(self.resource_overlap(employee, date, candidate));
        reasons.extend(self.limit.check(&self.ctx, employee, date, candidate));
        if let Some(code) = candidate {
            if self.ctx.config.is_excluded(employee, code) {
                reasons.push(ViolationReason::Excluded {
                    shift: code.to_string(),
                });
            }
        }

        reasons
    }

    fn rest_period(&self, employee: EmployeeId, date: NaiveDate, candidate: Option<&str>) -> Vec<ViolationReason> {
        let mut out = Vec::new();
        if let Some(prev) = date.pred_opt() {
            let before = self.ctx.rule_code(employee, prev);
            if RestPeriodRule::pair_violates(&self.ctx, before, candidate) {
                out.push(ViolationReason::RestPeriod {
                    night: prev,
                    early: date,
                });
            }
        }
        if let Some(next) = date.succ_opt() {
            let after = self.ctx.rule_code(employee, next);
            if RestPeriodRule::pair_violates(&self.ctx, candidate, after) {
                out.push(ViolationReason::RestPeriod {
                    night: date,
                    early: next,
                });
            }
        }
        out
    }

    fn resource_overlap(&self, employee: EmployeeId, date: NaiveDate, candidate: Option<&str>) -> Vec<ViolationReason> {
        let (Some(code), Some(tag)) = (candidate, self.ctx.ws.resource_on(employee, date)) else {
            return Vec::new();
        };
        self.ctx
            .ws
            .holders(tag, date)
            .into_iter()
            .filter(|other| *other != employee)
            .filter_map(|other| {
                let other_code = self.ctx.rule_code(other, date)?;
                self.ctx
                    .catalog
                    .overlaps(code, other_code)
                    .then(|| ViolationReason::ResourceOverlap {
                        resource: tag.clone(),
                        other,
                        other_shift: other_code.to_string(),
                    })
            })
            .collect()
    }
}
