//! Roster conflict detection with incremental recomputation and month caching.
//!
//! # Examples
//!
//! Full pass and an incremental edit on one working set:
//! ```
//! use std::sync::Arc;
//!
//! use chrono::{NaiveDate, NaiveTime};
//! use rosterguard::{
//!     config::EngineConfig,
//!     core::{records::{Assignment, Employee}, working_set::MonthWorkingSet},
//!     engine::violations::ViolationEngine,
//!     persist::{DateWindow, MonthBatch},
//!     shift::{ShiftCatalog, ShiftTypeDef},
//!     types::{Cell, YearMonth},
//! };
//!
//! let t = |h| NaiveTime::from_hms_opt(h, 0, 0).expect("time");
//! let config = EngineConfig::default();
//! let catalog = ShiftCatalog::build(
//!     [ShiftTypeDef::work("N", t(22), t(6)), ShiftTypeDef::work("T", t(6), t(14))],
//!     &config,
//! );
//! let engine = ViolationEngine::new(Arc::new(catalog), Arc::new(config.clone()));
//!
//! let month = YearMonth::new(2024, 5).expect("month");
//! let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).expect("date");
//! let batch = MonthBatch {
//!     employees: vec![Employee { id: 1, name: "Ada".to_string(), resource: None }],
//!     assignments: vec![
//!         Assignment { employee: 1, date: day(10), shift: Some("N".to_string()) },
//!         Assignment { employee: 1, date: day(11), shift: Some("T".to_string()) },
//!     ],
//!     ..MonthBatch::default()
//! };
//! let window = DateWindow::for_month(month, &config).expect("window");
//! let mut ws = MonthWorkingSet::from_batch(month, window, batch);
//! engine.recompute_month(&mut ws);
//! assert!(ws.violations().contains(Cell { employee: 1, day: 10 }));
//!
//! let outcome = engine
//!     .apply_shift_edit(&mut ws, 1, day(11), Some("FREI".to_string()))
//!     .expect("edit");
//! assert_eq!(outcome.changed.len(), 2);
//! assert!(ws.violations().is_empty());
//! ```
//!
//! Runtime usage with an in-memory loader:
//! ```no_run
//! use std::sync::Arc;
//!
//! use rosterguard::{
//!     cache::snapshot::SnapshotStore,
//!     config::EngineConfig,
//!     engine::violations::ViolationEngine,
//!     persist::memory::InMemorySource,
//!     runtime::{handle::spawn_roster, invalidator::CacheInvalidator, session::RosterSession},
//!     shift::{ShiftCatalog, ShiftTypeDef},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = Arc::new(EngineConfig::default());
//! let catalog = Arc::new(ShiftCatalog::build(Vec::<ShiftTypeDef>::new(), &config));
//! let snapshots = Arc::new(SnapshotStore::new());
//! let invalidator = CacheInvalidator::spawn(Arc::clone(&snapshots), config.invalidation_queue_bound);
//! let source = Arc::new(InMemorySource::from_json_str("{}").expect("roster json"));
//! let session = RosterSession::new(ViolationEngine::new(catalog, config), source, snapshots, invalidator);
//! let handle = spawn_roster(session);
//! let summary = handle.load_month(2024, 5).await.expect("load");
//! println!("{} flagged cells", summary.violations.len());
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Warm snapshot store.
pub mod cache;
/// Rule parameters.
pub mod config;
/// Working set and roster records.
pub mod core;
/// Violation rules, incremental engine and advisor.
pub mod engine;
/// Loader and calendar interfaces.
pub mod persist;
/// Session, invalidation worker and async handle.
pub mod runtime;
/// Shift catalog and time primitives.
pub mod shift;
/// Shared primitive types.
pub mod types;
