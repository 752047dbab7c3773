//! Watch system for cache change notifications.
//!
//! The watch system provides:
//! - Unique watch identifiers ([`WatchId`])
//! - Watch subscriptions ([`Watch`]) receiving [`CacheEvent`]s
//! - Watch management ([`WatchManager`]) for fanning events out to subscribers

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use sd_core::{PrimaryKey, SdError, SdResult};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

/// Unique identifier for a watch subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(u64);

impl WatchId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the numeric value of this watch ID.
    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "watch-{}", self.0)
    }
}

/// What happened to a cached entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheAction {
    /// A key was inserted for the first time.
    Created,
    /// A cached value was replaced by a different one.
    Updated,
    /// A key was removed.
    Deleted,
}

impl fmt::Display for CacheAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheAction::Created => write!(f, "created"),
            CacheAction::Updated => write!(f, "updated"),
            CacheAction::Deleted => write!(f, "deleted"),
        }
    }
}

/// A change applied to an entity cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEvent {
    /// Name of the cache the change was applied to.
    pub cache: String,
    /// Primary key of the changed entry.
    pub key: PrimaryKey,
    /// What happened.
    pub action: CacheAction,
}

/// A watch subscription receiving change notifications from one cache.
#[derive(Debug)]
pub struct Watch {
    id: WatchId,
    receiver: mpsc::Receiver<CacheEvent>,
}

impl Watch {
    /// Get the unique identifier for this watch.
    #[inline]
    pub fn id(&self) -> WatchId {
        self.id
    }

    /// Receive the next change notification.
    ///
    /// Returns `None` if the watch has been cancelled.
    pub async fn recv(&mut self) -> Option<CacheEvent> {
        self.receiver.recv().await
    }

    /// Try to receive a change notification without waiting.
    pub fn try_recv(&mut self) -> Result<CacheEvent, mpsc::error::TryRecvError> {
        self.receiver.try_recv()
    }
}

#[derive(Debug, Clone)]
struct WatchSender {
    id: WatchId,
    sender: mpsc::Sender<CacheEvent>,
}

impl WatchSender {
    /// Uses `try_send` so event application never blocks. If the channel is
    /// full the event is dropped.
    fn try_send(&self, event: CacheEvent) -> SdResult<()> {
        match self.sender.try_send(event) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                trace!(watch_id = %self.id, "watch channel full, dropping event");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(SdError::WatchClosed {
                watch_id: self.id.0,
            }),
        }
    }
}

/// Manager for the watch subscriptions of one cache.
///
/// Uses a `Mutex` internally but operations are fast (no I/O) and the lock
/// is never held while sending.
#[derive(Debug)]
pub struct WatchManager {
    watches: Mutex<Vec<WatchSender>>,
    channel_buffer: usize,
}

impl Default for WatchManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchManager {
    /// Create a new watch manager with default settings.
    pub fn new() -> Self {
        Self::with_buffer_size(16)
    }

    /// Create a new watch manager with a custom channel buffer size.
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            watches: Mutex::new(Vec::new()),
            channel_buffer: buffer_size.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<WatchSender>> {
        self.watches.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a new watch.
    pub fn create_watch(&self) -> Watch {
        let id = WatchId::next();
        let (sender, receiver) = mpsc::channel(self.channel_buffer);

        self.lock().push(WatchSender { id, sender });
        debug!(watch_id = %id, "created watch");

        Watch { id, receiver }
    }

    /// Cancel a watch subscription.
    pub fn cancel_watch(&self, watch_id: WatchId) {
        let mut watches = self.lock();
        if let Some(pos) = watches.iter().position(|s| s.id == watch_id) {
            watches.swap_remove(pos);
            debug!(watch_id = %watch_id, "cancelled watch");
            return;
        }
        warn!(watch_id = %watch_id, "attempted to cancel unknown watch");
    }

    /// Send an event to every watch, pruning closed ones.
    pub fn notify(&self, event: CacheEvent) {
        let senders: Vec<WatchSender> = self.lock().clone();
        if senders.is_empty() {
            return;
        }

        let mut closed_ids = Vec::new();
        for sender in &senders {
            if let Err(SdError::WatchClosed { watch_id }) = sender.try_send(event.clone()) {
                closed_ids.push(WatchId(watch_id));
            }
        }

        if !closed_ids.is_empty() {
            self.lock().retain(|s| !closed_ids.contains(&s.id));
            debug!(count = closed_ids.len(), "removed closed watches");
        }

        trace!(
            cache = %event.cache,
            key = %event.key,
            action = %event.action,
            watch_count = senders.len() - closed_ids.len(),
            "notified watches"
        );
    }

    /// Get the number of active watches.
    pub fn watch_count(&self) -> usize {
        self.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(key: &str, action: CacheAction) -> CacheEvent {
        CacheEvent {
            cache: "service".to_string(),
            key: key.to_string(),
            action,
        }
    }

    #[test]
    fn watch_id_unique() {
        let id1 = WatchId::next();
        let id2 = WatchId::next();
        assert_ne!(id1, id2);
        assert!(id1.to_string().starts_with("watch-"));
    }

    #[tokio::test]
    async fn watch_manager_create_and_notify() {
        let manager = WatchManager::new();
        let mut watch = manager.create_watch();
        assert_eq!(manager.watch_count(), 1);

        manager.notify(event("id1", CacheAction::Created));

        let received = watch.recv().await.unwrap();
        assert_eq!(received.key, "id1");
        assert_eq!(received.action, CacheAction::Created);
    }

    #[test]
    fn watch_manager_cancel() {
        let manager = WatchManager::new();
        let watch = manager.create_watch();
        assert_eq!(manager.watch_count(), 1);

        manager.cancel_watch(watch.id());
        assert_eq!(manager.watch_count(), 0);
    }

    #[test]
    fn dropped_watch_is_pruned_on_notify() {
        let manager = WatchManager::new();
        let watch = manager.create_watch();
        drop(watch);

        manager.notify(event("id1", CacheAction::Deleted));
        assert_eq!(manager.watch_count(), 0);
    }

    #[test]
    fn full_channel_drops_events() {
        let manager = WatchManager::with_buffer_size(1);
        let mut watch = manager.create_watch();

        manager.notify(event("id1", CacheAction::Created));
        manager.notify(event("id2", CacheAction::Created));

        assert_eq!(watch.try_recv().unwrap().key, "id1");
        assert!(watch.try_recv().is_err());
        assert_eq!(manager.watch_count(), 1);
    }
}
