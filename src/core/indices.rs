use chrono::NaiveDate;
use hashbrown::HashMap;

use crate::types::EmployeeId;

/// Employee/date key of a day-level record.
pub type DayKey = (EmployeeId, NaiveDate);

/// Key → employees holding it.
pub type VecIndex<K> = HashMap<K, Vec<EmployeeId>>;
