use std::{collections::BTreeSet, sync::Arc};

use chrono::NaiveDate;
use hashbrown::HashSet;

use crate::{
    config::EngineConfig,
    core::{records::DataWarning, working_set::MonthWorkingSet},
    shift::ShiftCatalog,
    types::{CalendarError, Cell, EmployeeId, ResourceTag, ShiftCode},
};

use super::{
    advisor::LiveConflictAdvisor,
    record::ViolationRecord,
    resource_overlap::ResourceOverlapRule,
    rest_period::RestPeriodRule,
    traits::{evaluate, RuleChecker, RuleContext, Scope},
    weekend::WeekendOffRule,
};

/// Result of one committed edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOutcome {
    /// Cells whose flagged/unflagged status flipped.
    pub changed: BTreeSet<Cell>,
    /// Shift stored before a shift edit; always `None` after a resource edit.
    pub previous_shift: Option<ShiftCode>,
    /// Administrator pin on the edited cell, reported only.
    pub lock: Option<ShiftCode>,
    /// Data-quality findings about the edit itself.
    pub warnings: Vec<DataWarning>,
}

/// Computes and maintains the violation record of a working set.
pub struct ViolationEngine {
    catalog: Arc<ShiftCatalog>,
    config: Arc<EngineConfig>,
    rules: Vec<Box<dyn RuleChecker>>,
}

impl ViolationEngine {
    /// Engine with the rest-period and resource-overlap rules.
    pub fn new(catalog: Arc<ShiftCatalog>, config: Arc<EngineConfig>) -> Self {
        Self {
            catalog,
            config,
            rules: vec![Box::new(RestPeriodRule), Box::new(ResourceOverlapRule)],
        }
    }

    /// Shift catalog the rules read.
    pub fn catalog(&self) -> &Arc<ShiftCatalog> {
        &self.catalog
    }

    /// Rule parameters.
    pub fn config(&self) -> &Arc<EngineConfig> {
        &self.config
    }

    /// Rule context over `ws`.
    pub fn context<'a>(&'a self, ws: &'a MonthWorkingSet) -> RuleContext<'a> {
        RuleContext {
            ws,
            catalog: &self.catalog,
            config: &self.config,
        }
    }

    /// Advisor bound to `ws`.
    pub fn advisor<'a>(&'a self, ws: &'a MonthWorkingSet) -> LiveConflictAdvisor<'a> {
        LiveConflictAdvisor::new(self.context(ws))
    }

    /// Free-weekend check for a work shift at `(employee, date)`.
    pub fn would_break_free_weekend(&self, ws: &MonthWorkingSet, employee: EmployeeId, date: NaiveDate) -> bool {
        WeekendOffRule::for_month(ws.month()).would_break_free_weekend(&self.context(ws), employee, date)
    }

    /// Rebuilds the whole violation record and the data-quality report.
    pub fn recompute_month(&self, ws: &mut MonthWorkingSet) -> Vec<DataWarning> {
        let (record, warnings) = {
            let ctx = self.context(ws);
            let mut record = ViolationRecord::default();
            for rule in &self.rules {
                record.replace(rule.kind(), evaluate(rule.as_ref(), &ctx, &Scope::Month));
            }
            (record, self.data_warnings(ws))
        };

        tracing::debug!(
            month = %ws.month(),
            flagged = record.cells().len(),
            warnings = warnings.len(),
            "full violation pass"
        );
        ws.finish_full_pass(record, warnings.clone());
        warnings
    }

    /// Commits a shift change and updates only the affected cells.
    pub fn apply_shift_edit(
        &self,
        ws: &mut MonthWorkingSet,
        employee: EmployeeId,
        date: NaiveDate,
        shift: Option<ShiftCode>,
    ) -> Result<EditOutcome, CalendarError> {
        ws.month().ensure_contains(date)?;
        let shift = shift.filter(|c| !c.is_empty());

        let mut warnings = Vec::new();
        if !ws.has_employee(employee) {
            warnings.push(DataWarning::UnknownEmployee { employee, date });
        }
        if let Some(code) = shift.as_ref().filter(|c| !self.catalog.knows(c)) {
            warnings.push(DataWarning::UnknownShift {
                employee,
                date,
                code: code.clone(),
            });
        }
        for warning in &warnings {
            tracing::warn!(%warning, "edit references data missing from the working set");
        }

        let mut previous = None;
        let changed = self.reconcile_edit(ws, employee, date, |ws| {
            previous = ws.set_shift(employee, date, shift);
        });

        Ok(EditOutcome {
            changed,
            previous_shift: previous,
            lock: ws.lock_at(employee, date).cloned(),
            warnings,
        })
    }

    /// Moves `employee` to another resource (or none) for one day.
    pub fn apply_resource_edit(
        &self,
        ws: &mut MonthWorkingSet,
        employee: EmployeeId,
        date: NaiveDate,
        resource: Option<ResourceTag>,
    ) -> Result<EditOutcome, CalendarError> {
        ws.month().ensure_contains(date)?;
        let changed = self.reconcile_edit(ws, employee, date, |ws| {
            ws.set_resource(employee, date, resource);
        });

        Ok(EditOutcome {
            changed,
            previous_shift: None,
            lock: ws.lock_at(employee, date).cloned(),
            warnings: Vec::new(),
        })
    }

    /// Applies `mutate`, then re-evaluates each rule over the union of its
    /// neighbourhoods before and after the mutation.
    fn reconcile_edit(
        &self,
        ws: &mut MonthWorkingSet,
        employee: EmployeeId,
        date: NaiveDate,
        mutate: impl FnOnce(&mut MonthWorkingSet),
    ) -> BTreeSet<Cell> {
        let mut scopes: Vec<HashSet<Cell>> = {
            let ctx = self.context(ws);
            self.rules
                .iter()
                .map(|rule| rule.neighborhood(&ctx, employee, date).into_iter().collect())
                .collect()
        };

        mutate(ws);

        let fresh: Vec<HashSet<Cell>> = {
            let ctx = self.context(ws);
            self.rules
                .iter()
                .zip(scopes.iter_mut())
                .map(|(rule, scope)| {
                    scope.extend(rule.neighborhood(&ctx, employee, date));
                    evaluate(rule.as_ref(), &ctx, &Scope::Cells(scope.clone()))
                })
                .collect()
        };

        let touched: HashSet<Cell> = scopes.iter().flatten().copied().collect();
        let before: HashSet<Cell> = touched
            .iter()
            .copied()
            .filter(|cell| ws.violations().contains(*cell))
            .collect();

        let record = ws.violations_mut();
        for ((rule, scope), violating) in self.rules.iter().zip(&scopes).zip(&fresh) {
            record.reconcile(rule.kind(), scope, violating);
        }

        let changed: BTreeSet<Cell> = touched
            .into_iter()
            .filter(|cell| before.contains(cell) != ws.violations().contains(*cell))
            .collect();
        ws.mark_incremental();

        tracing::debug!(employee, %date, changed = changed.len(), "incremental violation update");
        changed
    }

    fn data_warnings(&self, ws: &MonthWorkingSet) -> Vec<DataWarning> {
        let month = ws.month();
        let mut warnings: BTreeSet<DataWarning> = ws
            .assignments()
            .filter(|((_, date), _)| month.contains(*date))
            .filter_map(|((employee, date), code)| {
                if !ws.has_employee(*employee) {
                    Some(DataWarning::UnknownEmployee {
                        employee: *employee,
                        date: *date,
                    })
                } else if !self.catalog.knows(code) {
                    Some(DataWarning::UnknownShift {
                        employee: *employee,
                        date: *date,
                        code: code.clone(),
                    })
                } else {
                    None
                }
            })
            .collect();
        warnings.extend(
            self.catalog
                .missing_times()
                .map(|code| DataWarning::MissingShiftTimes { code: code.clone() }),
        );
        warnings.into_iter().collect()
    }
}
