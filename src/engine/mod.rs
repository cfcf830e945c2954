//! Violation rules, the incremental engine, and the live advisor.

/// Read-only legality queries for uncommitted assignments.
pub mod advisor;
/// Consecutive-workday ceiling.
pub mod consecutive;
/// Violation reasons reported to callers.
pub mod reason;
/// Per-rule violation record.
pub mod record;
/// Shared-resource overlap rule.
pub mod resource_overlap;
/// Rest-period rule.
pub mod rest_period;
/// Rule trait, evaluation scope and context.
pub mod traits;
/// Full and incremental violation computation.
pub mod violations;
/// Free-weekend advisory rule.
pub mod weekend;
