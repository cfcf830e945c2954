//! Per-month working set and the roster records it is built from.

/// Index aliases shared by the working set.
pub mod indices;
/// Roster records handed over by the loader.
pub mod records;
/// The hot month being edited.
pub mod working_set;
