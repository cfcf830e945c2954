//! Warm store of fully computed months.

/// Snapshot store keyed by month.
pub mod snapshot;
