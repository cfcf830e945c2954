use std::sync::{Arc, PoisonError, RwLock};

use hashbrown::HashMap;
use thiserror::Error;

use crate::{
    core::working_set::{Computation, MonthWorkingSet},
    types::YearMonth,
};

/// Snapshot store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// The working set was edited or never computed.
    #[error("{0} has not been through a full violation pass")]
    NotFullyComputed(YearMonth),
}

/// Immutable copy of a working set taken right after a full pass.
#[derive(Debug, Clone)]
pub struct MonthSnapshot {
    working_set: MonthWorkingSet,
}

impl MonthSnapshot {
    /// Copies `ws`; refuses anything edited since its last full pass.
    pub fn capture(ws: &MonthWorkingSet) -> Result<Self, SnapshotError> {
        if ws.computation() != Computation::Full {
            return Err(SnapshotError::NotFullyComputed(ws.month()));
        }
        Ok(Self {
            working_set: ws.clone(),
        })
    }

    /// Month the snapshot belongs to.
    pub fn month(&self) -> YearMonth {
        self.working_set.month()
    }

    /// Read-only view of the captured state.
    pub fn working_set(&self) -> &MonthWorkingSet {
        &self.working_set
    }

    /// Fresh mutable copy for use as the hot month.
    pub fn restore(&self) -> MonthWorkingSet {
        self.working_set.clone()
    }
}

/// Month → snapshot map shared by the interactive path and the invalidator.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    entries: RwLock<HashMap<YearMonth, Arc<MonthSnapshot>>>,
}

impl SnapshotStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot for `month`, if cached.
    pub fn get(&self, month: YearMonth) -> Option<Arc<MonthSnapshot>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&month)
            .cloned()
    }

    /// Installs `snapshot` under its own month, replacing any older entry.
    pub fn put(&self, snapshot: MonthSnapshot) {
        let month = snapshot.month();
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(month, Arc::new(snapshot));
    }

    /// Drops the entry for `month`. Returns whether one existed; absent keys are fine.
    pub fn invalidate(&self, month: YearMonth) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&month)
            .is_some()
    }

    /// True when `month` is cached.
    pub fn contains(&self, month: YearMonth) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&month)
    }

    /// Number of cached months.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
