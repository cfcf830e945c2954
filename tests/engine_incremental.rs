mod common;

use std::collections::BTreeSet;

use common::{assign, computed, employee, engine, full_recompute, may};
use rosterguard::{
    core::records::{
        DataWarning, LockInfo, PreferredDayOffRequest, RequestKind, RequestStatus, VacationInterval,
        VacationStatus,
    },
    engine::traits::RuleKind,
    persist::MonthBatch,
    types::{CalendarError, Cell},
};
use chrono::NaiveDate;

fn cell(employee: u32, day: u32) -> Cell {
    Cell { employee, day }
}

fn cells(list: &[(u32, u32)]) -> BTreeSet<Cell> {
    list.iter().map(|(e, d)| cell(*e, *d)).collect()
}

#[test]
fn night_followed_by_day_shift_flags_both_cells_and_clears_on_edit() {
    let engine = engine();
    let mut ws = computed(
        &engine,
        MonthBatch {
            employees: vec![employee(1, None)],
            assignments: vec![assign(1, may(10), "N"), assign(1, may(11), "T")],
            ..MonthBatch::default()
        },
    );

    assert_eq!(ws.violations().cells(), cells(&[(1, 10), (1, 11)]));
    assert_eq!(ws.violations().rules_at(cell(1, 10)), vec![RuleKind::RestPeriod]);

    let outcome = engine
        .apply_shift_edit(&mut ws, 1, may(11), Some("FREI".to_string()))
        .expect("edit");
    assert_eq!(outcome.changed, cells(&[(1, 10), (1, 11)]));
    assert_eq!(outcome.previous_shift.as_deref(), Some("T"));
    assert!(ws.violations().is_empty());
    assert_eq!(*ws.violations(), full_recompute(&engine, &ws));
}

#[test]
fn overlapping_handlers_of_one_resource_are_flagged_until_shift_moves() {
    let engine = engine();
    let mut ws = computed(
        &engine,
        MonthBatch {
            employees: vec![employee(1, Some("K9-1")), employee(2, Some("K9-1"))],
            assignments: vec![assign(1, may(15), "T"), assign(2, may(15), "S")],
            ..MonthBatch::default()
        },
    );

    assert_eq!(ws.violations().cells_for(RuleKind::ResourceOverlap), cells(&[(1, 15), (2, 15)]));

    let outcome = engine
        .apply_shift_edit(&mut ws, 2, may(15), Some("SP".to_string()))
        .expect("edit");
    assert_eq!(outcome.changed, cells(&[(1, 15), (2, 15)]));
    assert!(ws.violations().is_empty());
}

#[test]
fn handlers_of_different_resources_never_conflict() {
    let engine = engine();
    let ws = computed(
        &engine,
        MonthBatch {
            employees: vec![employee(1, Some("K9-1")), employee(2, Some("K9-2")), employee(3, None)],
            assignments: vec![
                assign(1, may(15), "T"),
                assign(2, may(15), "S"),
                assign(3, may(15), "S"),
            ],
            ..MonthBatch::default()
        },
    );
    assert!(ws.violations().is_empty());
}

#[test]
fn boundary_days_of_neighbouring_months_feed_the_rest_rule() {
    let engine = engine();
    let ws = computed(
        &engine,
        MonthBatch {
            employees: vec![employee(1, None)],
            assignments: vec![
                assign(1, NaiveDate::from_ymd_opt(2024, 4, 30).expect("date"), "N"),
                assign(1, may(1), "T"),
                assign(1, may(31), "N"),
                assign(1, NaiveDate::from_ymd_opt(2024, 6, 1).expect("date"), "F"),
            ],
            ..MonthBatch::default()
        },
    );

    assert_eq!(ws.violations().cells(), cells(&[(1, 1), (1, 31)]));
}

#[test]
fn approved_vacation_and_granted_day_off_reclassify_the_cell() {
    let engine = engine();
    let base = MonthBatch {
        employees: vec![employee(1, None), employee(2, None)],
        assignments: vec![
            assign(1, may(10), "N"),
            assign(1, may(11), "T"),
            assign(2, may(10), "N"),
            assign(2, may(11), "T"),
        ],
        ..MonthBatch::default()
    };

    let pending = computed(
        &engine,
        MonthBatch {
            vacations: vec![VacationInterval {
                employee: 1,
                start: may(11),
                end: may(12),
                status: VacationStatus::Pending,
            }],
            ..base.clone()
        },
    );
    assert!(pending.violations().contains(cell(1, 11)));

    let granted = computed(
        &engine,
        MonthBatch {
            vacations: vec![VacationInterval {
                employee: 1,
                start: NaiveDate::from_ymd_opt(2024, 4, 20).expect("date"),
                end: may(11),
                status: VacationStatus::Approved,
            }],
            preferred_days_off: vec![PreferredDayOffRequest {
                employee: 2,
                date: may(11),
                status: RequestStatus::Accepted,
                kind: RequestKind::DayOff,
            }],
            ..base
        },
    );
    assert!(granted.violations().is_empty());
}

#[test]
fn one_rule_clearing_keeps_the_other_rules_flag() {
    let engine = engine();
    let mut ws = computed(
        &engine,
        MonthBatch {
            employees: vec![employee(1, Some("K9-1")), employee(2, Some("K9-1"))],
            assignments: vec![
                assign(1, may(14), "N"),
                assign(1, may(15), "T"),
                assign(2, may(15), "S"),
            ],
            ..MonthBatch::default()
        },
    );
    assert_eq!(
        ws.violations().rules_at(cell(1, 15)),
        vec![RuleKind::RestPeriod, RuleKind::ResourceOverlap]
    );

    let outcome = engine
        .apply_shift_edit(&mut ws, 2, may(15), Some("FREI".to_string()))
        .expect("edit");
    assert_eq!(outcome.changed, cells(&[(2, 15)]));
    assert_eq!(ws.violations().rules_at(cell(1, 15)), vec![RuleKind::RestPeriod]);
    assert_eq!(*ws.violations(), full_recompute(&engine, &ws));
}

#[test]
fn resource_reassignment_reevaluates_old_and_new_handlers() {
    let engine = engine();
    let mut ws = computed(
        &engine,
        MonthBatch {
            employees: vec![
                employee(1, Some("K9-1")),
                employee(2, Some("K9-2")),
                employee(3, Some("K9-2")),
            ],
            assignments: vec![
                assign(1, may(15), "T"),
                assign(2, may(15), "S"),
                assign(3, may(15), "N"),
            ],
            ..MonthBatch::default()
        },
    );
    assert!(ws.violations().is_empty());

    let outcome = engine
        .apply_resource_edit(&mut ws, 2, may(15), Some("K9-1".to_string()))
        .expect("move 2 to K9-1");
    assert_eq!(outcome.changed, cells(&[(1, 15), (2, 15)]));
    assert_eq!(outcome.previous_shift, None);
    assert_eq!(ws.shift_at(2, may(15)).map(String::as_str), Some("S"));
    assert_eq!(*ws.violations(), full_recompute(&engine, &ws));

    let outcome = engine
        .apply_resource_edit(&mut ws, 3, may(15), Some("K9-1".to_string()))
        .expect("move 3 to K9-1");
    assert!(outcome.changed.is_empty());

    let outcome = engine
        .apply_shift_edit(&mut ws, 3, may(15), Some("SP".to_string()))
        .expect("late shift for 3");
    assert_eq!(outcome.changed, cells(&[(3, 15)]));
    assert_eq!(*ws.violations(), full_recompute(&engine, &ws));

    let outcome = engine
        .apply_resource_edit(&mut ws, 2, may(15), None)
        .expect("release 2");
    assert_eq!(outcome.changed, cells(&[(1, 15), (2, 15), (3, 15)]));
    assert!(ws.violations().is_empty());
    assert_eq!(*ws.violations(), full_recompute(&engine, &ws));
}

#[test]
fn handcrafted_edit_sequence_converges_with_full_recompute() {
    let engine = engine();
    let mut ws = computed(
        &engine,
        MonthBatch {
            employees: vec![employee(1, Some("K9-1")), employee(2, Some("K9-1")), employee(3, None)],
            ..MonthBatch::default()
        },
    );

    let edits: &[(u32, u32, Option<&str>)] = &[
        (1, 3, Some("N")),
        (1, 4, Some("T")),
        (1, 5, Some("N")),
        (1, 6, Some("KD")),
        (2, 4, Some("S")),
        (1, 4, Some("N")),
        (3, 31, Some("N")),
        (3, 1, Some("F")),
        (2, 4, None),
        (1, 5, Some("")),
        (2, 6, Some("T")),
        (1, 1, Some("N")),
        (1, 2, Some("FD")),
    ];

    for (employee, day, shift) in edits {
        engine
            .apply_shift_edit(&mut ws, *employee, may(*day), shift.map(str::to_string))
            .expect("edit");
        assert_eq!(*ws.violations(), full_recompute(&engine, &ws), "after editing {employee}@{day}");
    }

    assert!(ws.violations().contains(cell(1, 1)));
    assert!(ws.violations().contains(cell(1, 2)));
}

#[test]
fn edit_outcome_reports_lock_and_referential_gaps() {
    let engine = engine();
    let mut ws = computed(
        &engine,
        MonthBatch {
            employees: vec![employee(1, None)],
            assignments: vec![assign(1, may(3), "QQ"), assign(42, may(4), "T")],
            locks: vec![LockInfo {
                employee: 1,
                date: may(8),
                shift: "T".to_string(),
            }],
            ..MonthBatch::default()
        },
    );

    assert!(ws.warnings().contains(&DataWarning::UnknownShift {
        employee: 1,
        date: may(3),
        code: "QQ".to_string(),
    }));
    assert!(ws.warnings().contains(&DataWarning::UnknownEmployee {
        employee: 42,
        date: may(4),
    }));
    assert!(ws.warnings().contains(&DataWarning::MissingShiftTimes { code: "Z".to_string() }));

    let outcome = engine
        .apply_shift_edit(&mut ws, 1, may(8), Some("XYZ".to_string()))
        .expect("edit");
    assert_eq!(outcome.lock.as_deref(), Some("T"));
    assert_eq!(
        outcome.warnings,
        vec![DataWarning::UnknownShift {
            employee: 1,
            date: may(8),
            code: "XYZ".to_string(),
        }]
    );
    assert!(outcome.changed.is_empty());
}

#[test]
fn unknown_night_code_is_skipped_by_the_rules() {
    let mut config = rosterguard::config::EngineConfig::default();
    config.night_codes.insert("NX".to_string());
    let engine = common::engine_with(config);
    let ws = computed(
        &engine,
        MonthBatch {
            employees: vec![employee(1, None)],
            assignments: vec![assign(1, may(10), "NX"), assign(1, may(11), "T")],
            ..MonthBatch::default()
        },
    );
    assert!(ws.violations().is_empty());
}

#[test]
fn edits_outside_the_hot_month_are_rejected() {
    let engine = engine();
    let mut ws = computed(
        &engine,
        MonthBatch {
            employees: vec![employee(1, None)],
            ..MonthBatch::default()
        },
    );
    let june = NaiveDate::from_ymd_opt(2024, 6, 1).expect("date");

    let err = engine
        .apply_shift_edit(&mut ws, 1, june, Some("T".to_string()))
        .expect_err("outside month");
    assert!(matches!(err, CalendarError::DateOutsideMonth { .. }));
    assert_eq!(ws.shift_at(1, june), None);
}
