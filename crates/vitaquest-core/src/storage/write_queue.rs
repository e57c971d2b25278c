//! Per-key ordered persistence queue.
//!
//! In-memory updates are synchronous; the durable write happens here,
//! fire-and-forget. One worker task per key drains writes sequentially,
//! so the persisted value for a key always converges to the last
//! in-memory value even when the backend completes writes slowly or out
//! of order across keys. Failed writes are logged and dropped -- the
//! running session is unaffected, the next cold start may see stale data
//! for that key.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use super::kv::KeyValueStore;

/// Serializes persistence writes per key.
pub struct WriteQueue {
    store: Arc<dyn KeyValueStore>,
    lanes: Mutex<HashMap<&'static str, mpsc::UnboundedSender<String>>>,
    pending: Arc<AtomicUsize>,
}

impl WriteQueue {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            lanes: Mutex::new(HashMap::new()),
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Queue a serialized value for durable write under `key`.
    ///
    /// Returns immediately; writes to the same key are issued in call
    /// order. Must be called from within a tokio runtime.
    pub fn enqueue(&self, key: &'static str, value: String) {
        self.pending.fetch_add(1, Ordering::SeqCst);
        let mut lanes = self.lanes.lock().unwrap();
        let sender = lanes
            .entry(key)
            .or_insert_with(|| spawn_lane(key, Arc::clone(&self.store), Arc::clone(&self.pending)));
        if sender.send(value).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            tracing::error!(key, "write lane closed; dropping persistence write");
        }
    }

    /// Number of writes not yet settled.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Wait until every queued write has settled (success or failure).
    pub async fn flush(&self) {
        while self.pending() > 0 {
            tokio::task::yield_now().await;
        }
    }
}

fn spawn_lane(
    key: &'static str,
    store: Arc<dyn KeyValueStore>,
    pending: Arc<AtomicUsize>,
) -> mpsc::UnboundedSender<String> {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    tokio::spawn(async move {
        while let Some(value) = rx.recv().await {
            if let Err(e) = store.set(key, &value).await {
                tracing::warn!(key, error = %e, "persistence write failed; in-memory state unaffected");
            }
            pending.fetch_sub(1, Ordering::SeqCst);
        }
    });
    tx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::kv::MemoryStore;
    use async_trait::async_trait;

    #[tokio::test]
    async fn last_enqueued_value_wins() {
        let store = Arc::new(MemoryStore::new());
        let queue = WriteQueue::new(store.clone());
        for xp in 0..50 {
            queue.enqueue("myXP", xp.to_string());
        }
        queue.flush().await;
        assert_eq!(store.get("myXP").await.unwrap().as_deref(), Some("49"));
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let store = Arc::new(MemoryStore::new());
        let queue = WriteQueue::new(store.clone());
        queue.enqueue("myXP", "100".to_string());
        queue.enqueue("myLevel", "2".to_string());
        queue.flush().await;
        assert_eq!(store.get("myXP").await.unwrap().as_deref(), Some("100"));
        assert_eq!(store.get("myLevel").await.unwrap().as_deref(), Some("2"));
    }

    struct FailingStore;

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("down".into()))
        }
        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("down".into()))
        }
        async fn clear(&self) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("down".into()))
        }
    }

    #[tokio::test]
    async fn failed_writes_still_settle() {
        let queue = WriteQueue::new(Arc::new(FailingStore));
        queue.enqueue("myXP", "1".to_string());
        queue.enqueue("myXP", "2".to_string());
        queue.flush().await;
        assert_eq!(queue.pending(), 0);
    }
}
