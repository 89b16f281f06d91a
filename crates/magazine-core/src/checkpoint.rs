//! Checkpoint store — persists the engine's scan position.
//!
//! The checkpoint is a single integer: the next block number to scan.
//! It is read at the start of every sync cycle and written exactly once
//! at the end of a successful one. On restart the engine resumes from it
//! rather than re-scanning from genesis.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use crate::error::MagazineError;
use crate::store::GraphStore;

/// Key the checkpoint lives under in the graph store.
pub const CHECKPOINT_KEY: &str = "startBlockNumber";

/// Trait for storing and loading the scan checkpoint.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Load the saved checkpoint (`None` if none exists yet).
    async fn load(&self) -> Result<Option<u64>, MagazineError>;

    /// Save the checkpoint, replacing the previous value.
    async fn save(&self, next_block: u64) -> Result<(), MagazineError>;
}

/// Checkpoint store backed by the replicated graph store.
pub struct GraphCheckpointStore {
    store: Arc<dyn GraphStore>,
    key: String,
}

impl GraphCheckpointStore {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self::with_key(store, CHECKPOINT_KEY)
    }

    /// Use a non-default key, e.g. to keep several magazines in one store.
    pub fn with_key(store: Arc<dyn GraphStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

#[async_trait]
impl CheckpointStore for GraphCheckpointStore {
    async fn load(&self) -> Result<Option<u64>, MagazineError> {
        let value = self.store.get(&[&self.key]).await?;
        Ok(value.and_then(|v| v.as_u64()))
    }

    async fn save(&self, next_block: u64) -> Result<(), MagazineError> {
        self.store.put(&[&self.key], json!(next_block)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryGraphStore;

    #[tokio::test]
    async fn checkpoint_roundtrip() {
        let store = Arc::new(MemoryGraphStore::new());
        let cp = GraphCheckpointStore::new(store);

        assert!(cp.load().await.unwrap().is_none());

        cp.save(1000).await.unwrap();
        assert_eq!(cp.load().await.unwrap(), Some(1000));

        cp.save(1001).await.unwrap();
        assert_eq!(cp.load().await.unwrap(), Some(1001));
    }

    #[tokio::test]
    async fn non_numeric_value_reads_as_absent() {
        let store = Arc::new(MemoryGraphStore::new());
        store
            .put(&[CHECKPOINT_KEY], serde_json::json!("garbage"))
            .await
            .unwrap();

        let cp = GraphCheckpointStore::new(store);
        assert!(cp.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn custom_key_isolates_magazines() {
        let store = Arc::new(MemoryGraphStore::new());
        let a = GraphCheckpointStore::with_key(Arc::clone(&store) as Arc<dyn GraphStore>, "a");
        let b = GraphCheckpointStore::with_key(store, "b");

        a.save(5).await.unwrap();
        assert_eq!(a.load().await.unwrap(), Some(5));
        assert!(b.load().await.unwrap().is_none());
    }
}
