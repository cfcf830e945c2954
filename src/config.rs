//! Engine configuration.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::types::{EmployeeId, ShiftCode};

/// Rule parameters consumed by the violation engine and the advisor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Shift codes that start the rest-period window.
    pub night_codes: BTreeSet<ShiftCode>,
    /// Shift codes that may not directly follow a night shift.
    pub early_codes: BTreeSet<ShiftCode>,
    /// Administrative markers that never overlap anything.
    pub non_work_codes: BTreeSet<ShiftCode>,
    /// Hard ceiling on consecutive work days before a candidate date.
    pub max_consecutive_workdays: u32,
    /// Shift codes individual employees may not be assigned.
    pub exclusions: BTreeMap<EmployeeId, BTreeSet<ShiftCode>>,
    /// Days of the previous month the loader keeps resident.
    pub boundary_days_before: u32,
    /// Days of the next month the loader keeps resident.
    pub boundary_days_after: u32,
    /// Capacity of the cache invalidation queue.
    pub invalidation_queue_bound: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            night_codes: codes(&["N"]),
            early_codes: codes(&["T", "KD", "F", "FD"]),
            non_work_codes: codes(&["", "FREI", "U", "X", "K", "ZA"]),
            max_consecutive_workdays: 8,
            exclusions: BTreeMap::new(),
            boundary_days_before: 1,
            boundary_days_after: 3,
            invalidation_queue_bound: 64,
        }
    }
}

impl EngineConfig {
    /// Parses a JSON document; absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// True when `code` is one of the night codes.
    pub fn is_night(&self, code: &str) -> bool {
        self.night_codes.contains(code)
    }

    /// True when `code` may not follow a night shift.
    pub fn is_early(&self, code: &str) -> bool {
        self.early_codes.contains(code)
    }

    /// True when `employee` is barred from `code`.
    pub fn is_excluded(&self, employee: EmployeeId, code: &str) -> bool {
        self.exclusions
            .get(&employee)
            .is_some_and(|barred| barred.contains(code))
    }
}

fn codes(list: &[&str]) -> BTreeSet<ShiftCode> {
    list.iter().map(|c| (*c).to_string()).collect()
}
