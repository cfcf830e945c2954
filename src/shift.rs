//! Shift-type definitions and the time primitives built on them.

use std::{
    collections::BTreeSet,
    sync::{Mutex, PoisonError},
};

use chrono::{NaiveTime, Timelike};
use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::{config::EngineConfig, types::ShiftCode};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// One configured shift type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftTypeDef {
    /// Unique abbreviation.
    pub code: ShiftCode,
    /// Start of the shift; `None` when not configured.
    pub start: Option<NaiveTime>,
    /// End of the shift, may be earlier than `start` for overnight shifts.
    pub end: Option<NaiveTime>,
    /// Paid duration in hours.
    #[serde(default)]
    pub duration_hours: f64,
    /// Counts toward workload and the free-weekend rule.
    pub work: bool,
}

impl ShiftTypeDef {
    /// Work shift spanning `start`..`end`.
    pub fn work(code: &str, start: NaiveTime, end: NaiveTime) -> Self {
        let (s, e) = minute_span(start, end);
        Self {
            code: code.to_string(),
            start: Some(start),
            end: Some(end),
            duration_hours: f64::from(e - s) / 60.0,
            work: true,
        }
    }

    /// Administrative marker without times (free, vacation, ...).
    pub fn marker(code: &str) -> Self {
        Self {
            code: code.to_string(),
            start: None,
            end: None,
            duration_hours: 0.0,
            work: false,
        }
    }
}

/// Abbreviation → shift type lookup, fixed for the lifetime of a month.
#[derive(Debug)]
pub struct ShiftCatalog {
    defs: HashMap<ShiftCode, ShiftTypeDef>,
    non_work: BTreeSet<ShiftCode>,
    missing_times: BTreeSet<ShiftCode>,
    reported: Mutex<HashSet<ShiftCode>>,
}

impl ShiftCatalog {
    /// Builds the catalog, warning once per code that lacks time data.
    pub fn build(defs: impl IntoIterator<Item = ShiftTypeDef>, config: &EngineConfig) -> Self {
        let mut catalog = Self {
            defs: HashMap::new(),
            non_work: config.non_work_codes.clone(),
            missing_times: BTreeSet::new(),
            reported: Mutex::new(HashSet::new()),
        };
        catalog.rebuild(defs);
        catalog
    }

    /// Replaces all definitions. Codes already reported are not warned again.
    pub fn rebuild(&mut self, defs: impl IntoIterator<Item = ShiftTypeDef>) {
        self.defs.clear();
        self.missing_times.clear();
        for def in defs {
            self.defs.insert(def.code.clone(), def);
        }

        let missing: Vec<ShiftCode> = self
            .defs
            .values()
            .filter(|def| !self.non_work.contains(&def.code))
            .filter(|def| def.start.is_none() || def.end.is_none())
            .map(|def| def.code.clone())
            .collect();
        for code in missing {
            self.report_missing_times(&code);
            self.missing_times.insert(code);
        }
    }

    /// Definition for `code`.
    pub fn get(&self, code: &str) -> Option<&ShiftTypeDef> {
        self.defs.get(code)
    }

    /// True when `code` is defined or is a non-work marker.
    pub fn knows(&self, code: &str) -> bool {
        self.defs.contains_key(code) || self.non_work.contains(code)
    }

    /// True for empty, vacation, day-off and similar markers.
    pub fn is_non_work(&self, code: &str) -> bool {
        self.non_work.contains(code)
    }

    /// True when `code` counts as work; unknown codes do not.
    pub fn is_work(&self, code: &str) -> bool {
        !self.is_non_work(code) && self.defs.get(code).is_some_and(|def| def.work)
    }

    /// Codes defined without start or end time.
    pub fn missing_times(&self) -> impl Iterator<Item = &ShiftCode> {
        self.missing_times.iter()
    }

    /// Minute interval of `code`; overnight ends are pushed past 1440.
    pub fn interval_of(&self, code: &str) -> Option<(u32, u32)> {
        let def = self.defs.get(code);
        match def.and_then(|d| d.start.zip(d.end)) {
            Some((start, end)) => Some(minute_span(start, end)),
            None => {
                self.report_missing_times(code);
                None
            }
        }
    }

    /// True when both codes are timed work shifts whose intervals intersect.
    pub fn overlaps(&self, a: &str, b: &str) -> bool {
        if self.is_non_work(a) || self.is_non_work(b) {
            return false;
        }
        let (Some((a_start, a_end)), Some((b_start, b_end))) =
            (self.interval_of(a), self.interval_of(b))
        else {
            return false;
        };
        a_start < b_end && b_start < a_end
    }

    /// Codes already warned about, sorted.
    pub fn reported_codes(&self) -> Vec<ShiftCode> {
        let reported = self.reported.lock().unwrap_or_else(PoisonError::into_inner);
        let mut codes: Vec<ShiftCode> = reported.iter().cloned().collect();
        codes.sort();
        codes
    }

    fn report_missing_times(&self, code: &str) {
        let mut reported = self.reported.lock().unwrap_or_else(PoisonError::into_inner);
        if reported.insert(code.to_string()) {
            tracing::warn!(code, "shift code has no time data, treated as non-overlapping");
        }
    }
}

fn minute_span(start: NaiveTime, end: NaiveTime) -> (u32, u32) {
    let s = start.hour() * 60 + start.minute();
    let mut e = end.hour() * 60 + end.minute();
    if e <= s {
        e += MINUTES_PER_DAY;
    }
    (s, e)
}
