mod common;

use common::{assign, computed, employee, engine, may, shift_defs, t};
use rosterguard::{
    config::EngineConfig,
    persist::MonthBatch,
    shift::{ShiftCatalog, ShiftTypeDef},
};

#[test]
fn overnight_intervals_wrap_past_midnight() {
    let catalog = ShiftCatalog::build(shift_defs(), &EngineConfig::default());

    assert_eq!(catalog.interval_of("T"), Some((360, 840)));
    assert_eq!(catalog.interval_of("N"), Some((1320, 1800)));
    assert!(catalog.get("N").is_some_and(|def| (def.duration_hours - 8.0).abs() < f64::EPSILON));
}

#[test]
fn overlap_is_half_open_and_ignores_non_work_markers() {
    let catalog = ShiftCatalog::build(shift_defs(), &EngineConfig::default());

    assert!(catalog.overlaps("T", "S"));
    assert!(catalog.overlaps("S", "T"));
    assert!(!catalog.overlaps("T", "SP"));
    assert!(!catalog.overlaps("N", "T"));
    assert!(!catalog.overlaps("T", "FREI"));
    assert!(!catalog.overlaps("", "T"));
    assert!(!catalog.overlaps("U", "U"));
}

#[test]
fn missing_time_data_fails_open_and_is_reported_once() {
    let config = EngineConfig::default();
    let mut defs = shift_defs();
    defs.push(ShiftTypeDef {
        code: "Z".to_string(),
        start: Some(t(6, 0)),
        end: None,
        duration_hours: 8.0,
        work: true,
    });
    let mut catalog = ShiftCatalog::build(defs, &config);

    assert!(!catalog.overlaps("Z", "T"));
    assert!(!catalog.overlaps("Z", "Z"));
    assert!(!catalog.overlaps("T", "UNKNOWN"));
    assert!(catalog.is_work("Z"));
    assert!(!catalog.is_work("UNKNOWN"));
    assert_eq!(catalog.missing_times().cloned().collect::<Vec<_>>(), vec!["Z".to_string()]);

    catalog.rebuild(shift_defs());
    catalog.rebuild(shift_defs());
    assert_eq!(catalog.reported_codes(), vec!["UNKNOWN".to_string(), "Z".to_string()]);
}

#[test]
fn handlers_on_shifts_without_times_are_never_flagged() {
    let engine = engine();
    let ws = computed(
        &engine,
        MonthBatch {
            employees: vec![employee(1, Some("K9-1")), employee(2, Some("K9-1"))],
            assignments: vec![assign(1, may(15), "Z"), assign(2, may(15), "Z")],
            ..MonthBatch::default()
        },
    );
    assert!(ws.violations().is_empty());
}

#[test]
fn config_parses_partial_json_over_defaults() {
    let config = EngineConfig::from_json_str(
        r#"{ "max_consecutive_workdays": 6, "exclusions": { "7": ["N"] } }"#,
    )
    .expect("config");

    assert_eq!(config.max_consecutive_workdays, 6);
    assert!(config.is_excluded(7, "N"));
    assert!(!config.is_excluded(7, "T"));
    assert!(config.is_night("N"));
    assert!(config.is_early("T"));
    assert_eq!(config.boundary_days_before, 1);
}
