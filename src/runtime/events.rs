//! Cache event payloads.

use crate::types::YearMonth;

/// Events emitted by the invalidation worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// An invalidation job ran.
    Evicted {
        /// Month whose snapshot was dropped.
        month: YearMonth,
        /// False when no snapshot was stored.
        existed: bool,
    },
}
