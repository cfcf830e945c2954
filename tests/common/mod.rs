#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use rosterguard::{
    config::EngineConfig,
    core::{
        records::{Assignment, Employee},
        working_set::MonthWorkingSet,
    },
    engine::{record::ViolationRecord, violations::ViolationEngine},
    persist::{DateWindow, MonthBatch},
    shift::{ShiftCatalog, ShiftTypeDef},
    types::YearMonth,
};

pub const YEAR: i32 = 2024;
pub const MONTH: u32 = 5;

pub fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("time")
}

pub fn may(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(YEAR, MONTH, day).expect("date")
}

pub fn month() -> YearMonth {
    YearMonth::new(YEAR, MONTH).expect("month")
}

pub fn shift_defs() -> Vec<ShiftTypeDef> {
    vec![
        ShiftTypeDef::work("N", t(22, 0), t(6, 0)),
        ShiftTypeDef::work("T", t(6, 0), t(14, 0)),
        ShiftTypeDef::work("S", t(12, 0), t(20, 0)),
        ShiftTypeDef::work("SP", t(14, 0), t(22, 0)),
        ShiftTypeDef::work("KD", t(8, 0), t(12, 0)),
        ShiftTypeDef::work("F", t(5, 0), t(13, 0)),
        ShiftTypeDef::work("FD", t(7, 0), t(15, 0)),
        ShiftTypeDef::marker("FREI"),
        ShiftTypeDef::marker("U"),
        ShiftTypeDef {
            code: "Z".to_string(),
            start: None,
            end: None,
            duration_hours: 8.0,
            work: true,
        },
    ]
}

pub fn engine_with(config: EngineConfig) -> ViolationEngine {
    let catalog = ShiftCatalog::build(shift_defs(), &config);
    ViolationEngine::new(Arc::new(catalog), Arc::new(config))
}

pub fn engine() -> ViolationEngine {
    engine_with(EngineConfig::default())
}

pub fn employee(id: u32, resource: Option<&str>) -> Employee {
    Employee {
        id,
        name: format!("Employee {id}"),
        resource: resource.map(str::to_string),
    }
}

pub fn assign(employee: u32, date: NaiveDate, shift: &str) -> Assignment {
    Assignment {
        employee,
        date,
        shift: Some(shift.to_string()),
    }
}

pub fn working_set(batch: MonthBatch) -> MonthWorkingSet {
    let config = EngineConfig::default();
    let window = DateWindow::for_month(month(), &config).expect("window");
    MonthWorkingSet::from_batch(month(), window, batch)
}

pub fn computed(engine: &ViolationEngine, batch: MonthBatch) -> MonthWorkingSet {
    let mut ws = working_set(batch);
    engine.recompute_month(&mut ws);
    ws
}

pub fn full_recompute(engine: &ViolationEngine, ws: &MonthWorkingSet) -> ViolationRecord {
    let mut fresh = ws.clone();
    engine.recompute_month(&mut fresh);
    fresh.violations().clone()
}

pub fn roster_source() -> rosterguard::persist::memory::InMemorySource {
    let june = |d| NaiveDate::from_ymd_opt(YEAR, 6, d).expect("date");
    rosterguard::persist::memory::InMemorySource::new(MonthBatch {
        employees: vec![employee(1, Some("K9-1")), employee(2, Some("K9-1")), employee(3, None)],
        assignments: vec![
            assign(1, may(10), "N"),
            assign(1, may(11), "T"),
            assign(2, may(20), "T"),
            assign(1, june(3), "S"),
            assign(2, june(3), "T"),
        ],
        ..MonthBatch::default()
    })
}

/// Must run inside a tokio runtime: spawns the invalidation worker.
pub fn session_over(
    source: Arc<dyn rosterguard::persist::MonthSource>,
) -> rosterguard::runtime::session::RosterSession {
    use rosterguard::{cache::snapshot::SnapshotStore, runtime::invalidator::CacheInvalidator};

    let engine = engine();
    let snapshots = Arc::new(SnapshotStore::new());
    let invalidator = CacheInvalidator::spawn(Arc::clone(&snapshots), engine.config().invalidation_queue_bound);
    rosterguard::runtime::session::RosterSession::new(engine, source, snapshots, invalidator)
}
