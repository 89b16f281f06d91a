//! Event sink trait + graph-backed implementation.
//!
//! `emit` is awaited for every event before the engine moves to the next
//! log, so delivery is ordered and a slow consumer throttles the sync loop
//! instead of the engine racing ahead of it.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::MagazineError;
use crate::store::GraphStore;
use crate::types::DecodedEvent;

/// Root path segment decoded events are stored under.
pub const EVENTS_PATH: &str = "events";

/// Downstream consumer of decoded events.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: &DecodedEvent) -> Result<(), MagazineError>;
}

/// Sink that appends each event to `events/<name>` in the graph store.
pub struct GraphSink {
    store: Arc<dyn GraphStore>,
}

impl GraphSink {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EventSink for GraphSink {
    async fn emit(&self, event: &DecodedEvent) -> Result<(), MagazineError> {
        self.store
            .append(&[EVENTS_PATH, &event.name], event.to_json())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryGraphStore;
    use serde_json::json;

    fn ev(name: &str, block: u64, log_index: u32) -> DecodedEvent {
        DecodedEvent {
            name: name.to_string(),
            args: vec![("value".into(), json!(1))],
            block_number: block,
            tx_hash: "0xabc".into(),
            log_index,
        }
    }

    #[tokio::test]
    async fn emit_appends_under_event_name() {
        let store = Arc::new(MemoryGraphStore::new());
        let sink = GraphSink::new(Arc::clone(&store) as Arc<dyn GraphStore>);

        sink.emit(&ev("Transfer", 1, 0)).await.unwrap();
        sink.emit(&ev("Transfer", 1, 1)).await.unwrap();
        sink.emit(&ev("Approval", 2, 0)).await.unwrap();

        let transfers = store.collection(&[EVENTS_PATH, "Transfer"]);
        assert_eq!(transfers.len(), 2);
        assert_eq!(transfers[0]["logIndex"], 0);
        assert_eq!(transfers[1]["logIndex"], 1);
        assert_eq!(store.collection(&[EVENTS_PATH, "Approval"]).len(), 1);
    }
}
