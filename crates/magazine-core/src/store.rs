//! Replicated graph store trait + in-memory backend.
//!
//! The store is an external collaborator: an eventually-consistent,
//! key-path addressable graph. The engine uses four primitives —
//! point read, point write, insertion-ordered append, and a watch stream
//! over a collection. Last-write-wins on `put` is acceptable here because
//! the only contended value (the checkpoint) has a single writer.
//!
//! `MemoryGraphStore` implements the trait in RAM for tests and ephemeral
//! use; all data is lost when the process exits.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::error::MagazineError;

/// Trait over the replicated graph store.
///
/// Paths are slash-joined segment lists, e.g. `&["events", "Transfer"]`.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Read the value at a path, if any.
    async fn get(&self, path: &[&str]) -> Result<Option<Value>, MagazineError>;

    /// Write (replace) the value at a path.
    async fn put(&self, path: &[&str], value: Value) -> Result<(), MagazineError>;

    /// Append a value to the insertion-ordered collection at a path.
    async fn append(&self, path: &[&str], value: Value) -> Result<(), MagazineError>;

    /// Subscribe to the collection at a path. Existing entries are replayed
    /// in insertion order, then each later `append` is delivered once.
    /// No replay guarantee across disconnects.
    async fn watch(&self, path: &[&str]) -> Result<UnboundedReceiver<Value>, MagazineError>;
}

fn join(path: &[&str]) -> String {
    path.join("/")
}

/// In-memory graph store.
#[derive(Default)]
pub struct MemoryGraphStore {
    values: Mutex<HashMap<String, Value>>,
    collections: Mutex<HashMap<String, Vec<Value>>>,
    watchers: Mutex<HashMap<String, Vec<UnboundedSender<Value>>>>,
}

impl MemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the collection at a path (test convenience).
    pub fn collection(&self, path: &[&str]) -> Vec<Value> {
        self.collections
            .lock()
            .unwrap()
            .get(&join(path))
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl GraphStore for MemoryGraphStore {
    async fn get(&self, path: &[&str]) -> Result<Option<Value>, MagazineError> {
        Ok(self.values.lock().unwrap().get(&join(path)).cloned())
    }

    async fn put(&self, path: &[&str], value: Value) -> Result<(), MagazineError> {
        self.values.lock().unwrap().insert(join(path), value);
        Ok(())
    }

    async fn append(&self, path: &[&str], value: Value) -> Result<(), MagazineError> {
        let key = join(path);
        // Push and notify under the collections lock: a concurrent `watch`
        // that replays this value from the collection must not also receive
        // it from the notification below.
        let mut collections = self.collections.lock().unwrap();
        collections.entry(key.clone()).or_default().push(value.clone());

        // Notify live watchers; drop the ones whose receiver went away.
        if let Some(senders) = self.watchers.lock().unwrap().get_mut(&key) {
            senders.retain(|tx| tx.send(value.clone()).is_ok());
        }
        Ok(())
    }

    async fn watch(&self, path: &[&str]) -> Result<UnboundedReceiver<Value>, MagazineError> {
        let key = join(path);
        let (tx, rx) = mpsc::unbounded_channel();

        // Hold the collections lock across registration so no append lands
        // between the replay and the watcher becoming live.
        let collections = self.collections.lock().unwrap();
        if let Some(existing) = collections.get(&key) {
            for value in existing {
                let _ = tx.send(value.clone());
            }
        }
        self.watchers.lock().unwrap().entry(key).or_default().push(tx);
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn put_then_get_roundtrip() {
        let store = MemoryGraphStore::new();
        assert!(store.get(&["startBlockNumber"]).await.unwrap().is_none());

        store.put(&["startBlockNumber"], json!(42)).await.unwrap();
        assert_eq!(store.get(&["startBlockNumber"]).await.unwrap(), Some(json!(42)));

        // Last write wins
        store.put(&["startBlockNumber"], json!(43)).await.unwrap();
        assert_eq!(store.get(&["startBlockNumber"]).await.unwrap(), Some(json!(43)));
    }

    #[tokio::test]
    async fn append_preserves_insertion_order() {
        let store = MemoryGraphStore::new();
        store.append(&["events", "Transfer"], json!(1)).await.unwrap();
        store.append(&["events", "Transfer"], json!(2)).await.unwrap();
        store.append(&["events", "Transfer"], json!(3)).await.unwrap();

        assert_eq!(
            store.collection(&["events", "Transfer"]),
            vec![json!(1), json!(2), json!(3)]
        );
    }

    #[tokio::test]
    async fn watch_replays_then_streams() {
        let store = MemoryGraphStore::new();
        store.append(&["events", "Transfer"], json!("old")).await.unwrap();

        let mut rx = store.watch(&["events", "Transfer"]).await.unwrap();
        assert_eq!(rx.recv().await, Some(json!("old")));

        store.append(&["events", "Transfer"], json!("new")).await.unwrap();
        assert_eq!(rx.recv().await, Some(json!("new")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_append_and_watch_delivers_once() {
        use std::sync::Arc;

        for _ in 0..500 {
            let store = Arc::new(MemoryGraphStore::new());

            let appender = {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store.append(&["events", "Ping"], json!(1)).await.unwrap();
                })
            };
            let watcher = {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.watch(&["events", "Ping"]).await.unwrap() })
            };

            appender.await.unwrap();
            let mut rx = watcher.await.unwrap();
            drop(store); // closes the channel once the last sender is gone

            let mut seen = 0;
            while let Some(value) = rx.recv().await {
                assert_eq!(value, json!(1));
                seen += 1;
            }
            // Replayed or notified, never both
            assert_eq!(seen, 1);
        }
    }

    #[tokio::test]
    async fn watch_is_per_path() {
        let store = MemoryGraphStore::new();
        let mut rx = store.watch(&["events", "Approval"]).await.unwrap();

        store.append(&["events", "Transfer"], json!("t")).await.unwrap();
        store.append(&["events", "Approval"], json!("a")).await.unwrap();

        assert_eq!(rx.recv().await, Some(json!("a")));
    }
}
