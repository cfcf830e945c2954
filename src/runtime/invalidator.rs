use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};

use crate::{cache::snapshot::SnapshotStore, types::YearMonth};

use super::{events::CacheEvent, handle::RuntimeError};

enum InvalidationMsg {
    Invalidate(YearMonth),
    Flush { resp: oneshot::Sender<()> },
    Shutdown { resp: oneshot::Sender<()> },
}

/// Evicts snapshots on a background task fed by a bounded queue.
///
/// Jobs are idempotent and never cancelled; a job for a month that was
/// re-snapshotted in the meantime only causes a cache miss.
#[derive(Clone)]
pub struct CacheInvalidator {
    tx: mpsc::Sender<InvalidationMsg>,
    events_tx: broadcast::Sender<CacheEvent>,
    store: Arc<SnapshotStore>,
}

impl CacheInvalidator {
    /// Spawns the worker on the current tokio runtime.
    pub fn spawn(store: Arc<SnapshotStore>, queue_bound: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<InvalidationMsg>(queue_bound.max(1));
        let (events_tx, _) = broadcast::channel::<CacheEvent>(256);

        let worker_store = Arc::clone(&store);
        let worker_events = events_tx.clone();
        tokio::spawn(async move {
            tracing::info!("cache invalidation worker started");
            while let Some(msg) = rx.recv().await {
                match msg {
                    InvalidationMsg::Invalidate(month) => {
                        let existed = worker_store.invalidate(month);
                        tracing::debug!(%month, existed, "snapshot invalidated");
                        let _ = worker_events.send(CacheEvent::Evicted { month, existed });
                    }
                    InvalidationMsg::Flush { resp } => {
                        let _ = resp.send(());
                    }
                    InvalidationMsg::Shutdown { resp } => {
                        rx.close();
                        let _ = resp.send(());
                        break;
                    }
                }
            }
            tracing::info!("cache invalidation worker stopped");
        });

        Self {
            tx,
            events_tx,
            store,
        }
    }

    /// Eviction events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events_tx.subscribe()
    }

    pub(crate) fn events_sender(&self) -> broadcast::Sender<CacheEvent> {
        self.events_tx.clone()
    }

    /// Queues eviction of `month` without waiting.
    ///
    /// With the queue full or the worker gone the entry is dropped inline,
    /// so a stale snapshot never survives an edit.
    pub fn enqueue(&self, month: YearMonth) {
        if let Err(err) = self.tx.try_send(InvalidationMsg::Invalidate(month)) {
            tracing::warn!(%month, "invalidation queue unavailable ({err}), evicting inline");
            let existed = self.store.invalidate(month);
            let _ = self.events_tx.send(CacheEvent::Evicted { month, existed });
        }
    }

    /// Waits until every job queued before this call has run.
    pub async fn flush(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(InvalidationMsg::Flush { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Drains queued jobs and stops the worker.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(InvalidationMsg::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}
