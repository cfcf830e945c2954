use std::collections::BTreeSet;

use hashbrown::{HashMap, HashSet};

use crate::types::Cell;

use super::traits::RuleKind;

/// Cells flagged by at least one rule in the current month.
///
/// Kept per rule so that one rule's recomputation never clears another
/// rule's flags on a shared cell. Empty rule entries are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViolationRecord {
    by_rule: HashMap<RuleKind, HashSet<Cell>>,
}

impl ViolationRecord {
    /// True when any rule flags `cell`.
    pub fn contains(&self, cell: Cell) -> bool {
        self.by_rule.values().any(|cells| cells.contains(&cell))
    }

    /// True when no rule flags any cell.
    pub fn is_empty(&self) -> bool {
        self.by_rule.is_empty()
    }

    /// All flagged cells, ordered.
    pub fn cells(&self) -> BTreeSet<Cell> {
        self.by_rule.values().flatten().copied().collect()
    }

    /// Cells flagged by `rule`, ordered.
    pub fn cells_for(&self, rule: RuleKind) -> BTreeSet<Cell> {
        self.by_rule
            .get(&rule)
            .map(|cells| cells.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Rules flagging `cell`.
    pub fn rules_at(&self, cell: Cell) -> Vec<RuleKind> {
        let mut rules: Vec<RuleKind> = self
            .by_rule
            .iter()
            .filter(|(_, cells)| cells.contains(&cell))
            .map(|(rule, _)| *rule)
            .collect();
        rules.sort_unstable();
        rules
    }

    pub(crate) fn replace(&mut self, rule: RuleKind, cells: HashSet<Cell>) {
        if cells.is_empty() {
            self.by_rule.remove(&rule);
        } else {
            self.by_rule.insert(rule, cells);
        }
    }

    /// Sets the status of every cell in `scope` for `rule` to membership in `violating`.
    pub(crate) fn reconcile(&mut self, rule: RuleKind, scope: &HashSet<Cell>, violating: &HashSet<Cell>) {
        let entry = self.by_rule.entry(rule).or_default();
        for cell in scope {
            if violating.contains(cell) {
                entry.insert(*cell);
            } else {
                entry.remove(cell);
            }
        }
        if entry.is_empty() {
            self.by_rule.remove(&rule);
        }
    }
}
