use std::collections::BTreeSet;

use chrono::NaiveDate;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::{
    core::records::DataWarning,
    engine::{reason::ViolationReason, violations::EditOutcome},
    types::{Cell, EmployeeId, ResourceTag, ShiftCode, YearMonth},
};

use super::{
    events::CacheEvent,
    session::{LoadSource, RosterSession, SessionError},
};

/// Failures of the async handle.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The session rejected the request.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// The roster task is gone.
    #[error("roster runtime has shut down")]
    ChannelClosed,
    /// The blocking loader task panicked or was cancelled.
    #[error("loader task failed: {0}")]
    Join(String),
}

/// What the UI needs after switching months.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSummary {
    /// Month now hot.
    pub month: YearMonth,
    /// Where it came from.
    pub source: LoadSource,
    /// Flagged cells.
    pub violations: BTreeSet<Cell>,
    /// Data-quality findings of the last full pass.
    pub warnings: Vec<DataWarning>,
}

/// Cloneable handle to the single-writer roster task.
#[derive(Clone)]
pub struct RosterHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<CacheEvent>,
}

enum Command {
    LoadMonth {
        year: i32,
        month: u32,
        resp: oneshot::Sender<Result<MonthSummary, RuntimeError>>,
    },
    ApplyEdit {
        employee: EmployeeId,
        date: NaiveDate,
        shift: Option<ShiftCode>,
        resp: oneshot::Sender<Result<EditOutcome, RuntimeError>>,
    },
    ApplyResourceEdit {
        employee: EmployeeId,
        date: NaiveDate,
        resource: Option<ResourceTag>,
        resp: oneshot::Sender<Result<EditOutcome, RuntimeError>>,
    },
    QueryLegality {
        employee: EmployeeId,
        date: NaiveDate,
        candidate: Option<ShiftCode>,
        resp: oneshot::Sender<Result<Vec<ViolationReason>, RuntimeError>>,
    },
    WouldBreakFreeWeekend {
        employee: EmployeeId,
        date: NaiveDate,
        resp: oneshot::Sender<Result<bool, RuntimeError>>,
    },
    Invalidate {
        year: i32,
        month: u32,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    Violations {
        resp: oneshot::Sender<Result<BTreeSet<Cell>, RuntimeError>>,
    },
    Shutdown {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
}

/// Moves `session` onto a task that applies commands one at a time.
pub fn spawn_roster(session: RosterSession) -> RosterHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(256);
    let events_tx = session.invalidator().events_sender();

    tokio::spawn(async move {
        let mut session = session;
        while let Some(cmd) = cmd_rx.recv().await {
            if handle_command(cmd, &mut session).await {
                break;
            }
        }
    });

    RosterHandle { cmd_tx, events_tx }
}

impl RosterHandle {
    /// Snapshot eviction events.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events_tx.subscribe()
    }

    /// Makes a month hot; the loader runs on a blocking task.
    pub async fn load_month(&self, year: i32, month: u32) -> Result<MonthSummary, RuntimeError> {
        self.request(|resp| Command::LoadMonth { year, month, resp }).await
    }

    /// Commits a shift change.
    pub async fn apply_edit(
        &self,
        employee: EmployeeId,
        date: NaiveDate,
        shift: Option<ShiftCode>,
    ) -> Result<EditOutcome, RuntimeError> {
        self.request(|resp| Command::ApplyEdit {
            employee,
            date,
            shift,
            resp,
        })
        .await
    }

    /// Commits a per-day resource change.
    pub async fn apply_resource_edit(
        &self,
        employee: EmployeeId,
        date: NaiveDate,
        resource: Option<ResourceTag>,
    ) -> Result<EditOutcome, RuntimeError> {
        self.request(|resp| Command::ApplyResourceEdit {
            employee,
            date,
            resource,
            resp,
        })
        .await
    }

    /// Reasons a candidate would be illegal.
    pub async fn query_legality(
        &self,
        employee: EmployeeId,
        date: NaiveDate,
        candidate: Option<ShiftCode>,
    ) -> Result<Vec<ViolationReason>, RuntimeError> {
        self.request(|resp| Command::QueryLegality {
            employee,
            date,
            candidate,
            resp,
        })
        .await
    }

    /// Free-weekend check for a work shift on `date`.
    pub async fn would_break_free_weekend(&self, employee: EmployeeId, date: NaiveDate) -> Result<bool, RuntimeError> {
        self.request(|resp| Command::WouldBreakFreeWeekend {
            employee,
            date,
            resp,
        })
        .await
    }

    /// Schedules eviction of a month's snapshot.
    pub async fn invalidate(&self, year: i32, month: u32) -> Result<(), RuntimeError> {
        self.request(|resp| Command::Invalidate { year, month, resp }).await
    }

    /// Flagged cells of the hot month.
    pub async fn violations(&self) -> Result<BTreeSet<Cell>, RuntimeError> {
        self.request(|resp| Command::Violations { resp }).await
    }

    /// Drains pending invalidations and stops the task.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.request(|resp| Command::Shutdown { resp }).await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, RuntimeError>>) -> Command,
    ) -> Result<T, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(build(tx))
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }
}

async fn handle_command(cmd: Command, session: &mut RosterSession) -> bool {
    match cmd {
        Command::LoadMonth { year, month, resp } => {
            let _ = resp.send(load_month(session, year, month).await);
        }
        Command::ApplyEdit {
            employee,
            date,
            shift,
            resp,
        } => {
            let res = session
                .apply_edit(employee, date, shift)
                .map_err(RuntimeError::from);
            let _ = resp.send(res);
        }
        Command::ApplyResourceEdit {
            employee,
            date,
            resource,
            resp,
        } => {
            let res = session
                .apply_resource_edit(employee, date, resource)
                .map_err(RuntimeError::from);
            let _ = resp.send(res);
        }
        Command::QueryLegality {
            employee,
            date,
            candidate,
            resp,
        } => {
            let res = session
                .query_legality(employee, date, candidate.as_deref())
                .map_err(RuntimeError::from);
            let _ = resp.send(res);
        }
        Command::WouldBreakFreeWeekend {
            employee,
            date,
            resp,
        } => {
            let res = session
                .would_break_free_weekend(employee, date)
                .map_err(RuntimeError::from);
            let _ = resp.send(res);
        }
        Command::Invalidate { year, month, resp } => {
            let res = session.invalidate(year, month).map_err(RuntimeError::from);
            let _ = resp.send(res);
        }
        Command::Violations { resp } => {
            let res = session
                .hot()
                .map(|ws| ws.violations().cells())
                .ok_or(RuntimeError::Session(SessionError::NoMonthLoaded));
            let _ = resp.send(res);
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(session.invalidator().shutdown().await);
            return true;
        }
    }

    false
}

async fn load_month(session: &mut RosterSession, year: i32, month: u32) -> Result<MonthSummary, RuntimeError> {
    let month = YearMonth::new(year, month).map_err(SessionError::from)?;

    let source = match session.try_activate_cached(month) {
        Some(source) => source,
        None => {
            let loader = session.source();
            let window = session.window(month).map_err(SessionError::from)?;
            let batch = tokio::task::spawn_blocking(move || loader.fetch_month(month, window))
                .await
                .map_err(|e| RuntimeError::Join(e.to_string()))?
                .map_err(SessionError::from)?;
            session.activate_batch(month, batch)?;
            LoadSource::Source
        }
    };

    let ws = session
        .hot()
        .ok_or(RuntimeError::Session(SessionError::NoMonthLoaded))?;
    Ok(MonthSummary {
        month,
        source,
        violations: ws.violations().cells(),
        warnings: ws.warnings().to_vec(),
    })
}
