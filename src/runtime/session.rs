use std::sync::Arc;

use chrono::NaiveDate;
use hashbrown::HashSet;
use thiserror::Error;

use crate::{
    cache::snapshot::{MonthSnapshot, SnapshotError, SnapshotStore},
    core::working_set::MonthWorkingSet,
    engine::{reason::ViolationReason, violations::{EditOutcome, ViolationEngine}},
    persist::{DateWindow, MonthBatch, MonthSource, SourceError},
    types::{CalendarError, EmployeeId, ResourceTag, ShiftCode, YearMonth},
};

use super::invalidator::CacheInvalidator;

/// Rejected session requests.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Invalid month or date.
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    /// The loader failed.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// The computed month could not be cached.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    /// Nothing is hot yet.
    #[error("no month is loaded")]
    NoMonthLoaded,
}

/// Where a loaded month came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Already the hot month.
    Hot,
    /// Restored from the snapshot store.
    Snapshot,
    /// Fetched from the loader and recomputed.
    Source,
}

/// Owns the hot month and routes edits through the engine.
///
/// Edits are applied in call order; the `&mut self` receivers provide the
/// serialization the incremental path depends on.
pub struct RosterSession {
    engine: ViolationEngine,
    source: Arc<dyn MonthSource>,
    snapshots: Arc<SnapshotStore>,
    invalidator: CacheInvalidator,
    hot: Option<MonthWorkingSet>,
    pending: HashSet<YearMonth>,
}

impl RosterSession {
    /// Session with no hot month.
    pub fn new(
        engine: ViolationEngine,
        source: Arc<dyn MonthSource>,
        snapshots: Arc<SnapshotStore>,
        invalidator: CacheInvalidator,
    ) -> Self {
        Self {
            engine,
            source,
            snapshots,
            invalidator,
            hot: None,
            pending: HashSet::new(),
        }
    }

    /// Engine used for every pass.
    pub fn engine(&self) -> &ViolationEngine {
        &self.engine
    }

    /// Shared snapshot store.
    pub fn snapshots(&self) -> &Arc<SnapshotStore> {
        &self.snapshots
    }

    /// Eviction worker handle.
    pub fn invalidator(&self) -> &CacheInvalidator {
        &self.invalidator
    }

    /// Loader shared with blocking tasks.
    pub fn source(&self) -> Arc<dyn MonthSource> {
        Arc::clone(&self.source)
    }

    /// The month being edited.
    pub fn hot(&self) -> Option<&MonthWorkingSet> {
        self.hot.as_ref()
    }

    /// Date range the loader must deliver for `month`.
    pub fn window(&self, month: YearMonth) -> Result<DateWindow, CalendarError> {
        DateWindow::for_month(month, self.engine.config())
    }

    /// Makes `year-month` the hot month, using the snapshot store when fresh.
    pub fn load_month(&mut self, year: i32, month: u32) -> Result<LoadSource, SessionError> {
        let month = YearMonth::new(year, month)?;
        if let Some(source) = self.try_activate_cached(month) {
            return Ok(source);
        }
        let batch = self.source.fetch_month(month, self.window(month)?)?;
        self.activate_batch(month, batch)?;
        Ok(LoadSource::Source)
    }

    /// Activates `month` without I/O if it is hot or has a usable snapshot.
    pub fn try_activate_cached(&mut self, month: YearMonth) -> Option<LoadSource> {
        if self.hot.as_ref().is_some_and(|ws| ws.month() == month) {
            return Some(LoadSource::Hot);
        }
        if self.pending.contains(&month) {
            tracing::debug!(%month, "snapshot pending invalidation, reloading");
            return None;
        }
        let snapshot = self.snapshots.get(month)?;
        tracing::debug!(%month, "month restored from snapshot");
        self.hot = Some(snapshot.restore());
        Some(LoadSource::Snapshot)
    }

    /// Builds the hot month from a fetched batch, runs the full pass and
    /// stores the result as the month's snapshot.
    pub fn activate_batch(&mut self, month: YearMonth, batch: MonthBatch) -> Result<&MonthWorkingSet, SessionError> {
        let mut ws = MonthWorkingSet::from_batch(month, self.window(month)?, batch);
        self.engine.recompute_month(&mut ws);
        self.snapshots.put(MonthSnapshot::capture(&ws)?);
        self.pending.remove(&month);
        Ok(self.hot.insert(ws))
    }

    /// Commits a shift change on the hot month.
    pub fn apply_edit(
        &mut self,
        employee: EmployeeId,
        date: NaiveDate,
        shift: Option<ShiftCode>,
    ) -> Result<EditOutcome, SessionError> {
        let ws = self.hot.as_mut().ok_or(SessionError::NoMonthLoaded)?;
        let outcome = self.engine.apply_shift_edit(ws, employee, date, shift)?;
        let month = ws.month();
        self.mark_stale(month);
        Ok(outcome)
    }

    /// Commits a per-day resource reassignment on the hot month.
    pub fn apply_resource_edit(
        &mut self,
        employee: EmployeeId,
        date: NaiveDate,
        resource: Option<ResourceTag>,
    ) -> Result<EditOutcome, SessionError> {
        let ws = self.hot.as_mut().ok_or(SessionError::NoMonthLoaded)?;
        let outcome = self.engine.apply_resource_edit(ws, employee, date, resource)?;
        let month = ws.month();
        self.mark_stale(month);
        Ok(outcome)
    }

    /// Reasons a candidate shift would be illegal; empty means legal.
    pub fn query_legality(
        &self,
        employee: EmployeeId,
        date: NaiveDate,
        candidate: Option<&str>,
    ) -> Result<Vec<ViolationReason>, SessionError> {
        let ws = self.hot_in_month(date)?;
        Ok(self.engine.advisor(ws).evaluate(employee, date, candidate))
    }

    /// True when a work shift on `date` would leave `employee` without a free weekend.
    pub fn would_break_free_weekend(&self, employee: EmployeeId, date: NaiveDate) -> Result<bool, SessionError> {
        let ws = self.hot_in_month(date)?;
        Ok(self.engine.would_break_free_weekend(ws, employee, date))
    }

    /// Schedules eviction of a month's snapshot.
    pub fn invalidate(&mut self, year: i32, month: u32) -> Result<(), SessionError> {
        let month = YearMonth::new(year, month)?;
        self.mark_stale(month);
        Ok(())
    }

    fn hot_in_month(&self, date: NaiveDate) -> Result<&MonthWorkingSet, SessionError> {
        let ws = self.hot.as_ref().ok_or(SessionError::NoMonthLoaded)?;
        ws.month().ensure_contains(date)?;
        Ok(ws)
    }

    fn mark_stale(&mut self, month: YearMonth) {
        self.pending.insert(month);
        self.invalidator.enqueue(month);
    }
}
