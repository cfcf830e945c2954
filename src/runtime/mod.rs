//! Interactive session, cache invalidation worker and async handle.

/// Event stream types emitted by the invalidation worker.
pub mod events;
/// Single-writer async handle over a session.
pub mod handle;
/// Background snapshot eviction.
pub mod invalidator;
/// Synchronous session over the hot month.
pub mod session;
