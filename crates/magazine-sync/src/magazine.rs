//! The `Magazine` facade — a decentralized log of one contract's events.
//!
//! A magazine ties together the chain reader, the ABI descriptor table,
//! the graph-backed checkpoint and sink, and the sync engine, and adds the
//! discovery surface: `publish` writes the magazine's access coordinates
//! into the graph store under a slug of its name, and `subscribe`
//! reconstructs a magazine from a published record.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

use magazine_abi::LogDecoder;
use magazine_core::{
    ChainReader, GraphCheckpointStore, GraphSink, GraphStore, MagazineError, EVENTS_PATH,
};

use crate::config::SyncConfig;
use crate::engine::{CycleReport, SyncEngine};

/// Relay url recorded in a published magazine when none is supplied.
pub const DEFAULT_RELAY_URL: &str = "https://gunjs.herokuapp.com/gun";

/// Path segment the subscriber-side peer list lives under.
pub const PEERS_PATH: &str = "peers";

/// The discoverable record a magazine publishes at its slug path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagazineRecord {
    pub name: String,
    pub address: String,
    #[serde(rename = "networkId")]
    pub network_id: u64,
    pub abi: Vec<String>,
    pub url: String,
}

/// Options for `Magazine::publish`.
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    /// Publish under this id instead of the slugged name.
    pub alias: Option<String>,
    /// Relay url to record; defaults to [`DEFAULT_RELAY_URL`].
    pub url: Option<String>,
}

/// A decentralized, replicated log of one contract's decoded events.
pub struct Magazine {
    config: SyncConfig,
    store: Arc<dyn GraphStore>,
    engine: SyncEngine,
}

impl std::fmt::Debug for Magazine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Magazine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Magazine {
    /// Build a magazine over a chain reader and a graph store. Pure setup:
    /// the ABI fragments are parsed here, but no I/O happens until a sync
    /// is started.
    pub fn new(
        config: SyncConfig,
        reader: Arc<dyn ChainReader>,
        store: Arc<dyn GraphStore>,
    ) -> Result<Self, MagazineError> {
        let decoder = LogDecoder::from_fragments(&config.abi)?;
        let checkpoint = Arc::new(GraphCheckpointStore::new(Arc::clone(&store)));
        let sink = Arc::new(GraphSink::new(Arc::clone(&store)));
        let engine = SyncEngine::new(
            decoder,
            config.address.clone(),
            reader,
            checkpoint,
            sink,
            config.decode_policy,
            config.fetch_concurrency,
        );
        Ok(Self {
            config,
            store,
            engine,
        })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Begin periodic syncing at the configured poll interval. Restart-safe:
    /// any previous schedule is cancelled first.
    pub fn start_sync(&mut self) {
        self.engine
            .start(Duration::from_millis(self.config.poll_interval_ms));
    }

    /// Stop periodic syncing. An in-flight cycle is allowed to finish.
    pub fn stop_sync(&mut self) {
        self.engine.stop();
    }

    /// Run a single sync cycle now.
    pub async fn sync_once(&self) -> Result<CycleReport, MagazineError> {
        self.engine.run_cycle().await
    }

    /// The id a name publishes under: lowercased, whitespace replaced
    /// with `-`.
    pub fn slug(name: &str) -> String {
        name.to_lowercase()
            .chars()
            .map(|c| if c.is_whitespace() { '-' } else { c })
            .collect()
    }

    /// Publish this magazine's access coordinates to the store. Returns
    /// the id it was published under.
    pub async fn publish(&self, options: PublishOptions) -> Result<String, MagazineError> {
        let id = options
            .alias
            .unwrap_or_else(|| Self::slug(&self.config.name));
        let record = MagazineRecord {
            name: self.config.name.clone(),
            address: self.config.address.clone(),
            network_id: self.config.network_id,
            abi: self.config.abi.clone(),
            url: options.url.unwrap_or_else(|| DEFAULT_RELAY_URL.to_string()),
        };
        let value = serde_json::to_value(&record)
            .map_err(|e| MagazineError::StoreUnavailable(e.to_string()))?;
        self.store.put(&[&id], value).await?;
        Ok(id)
    }

    /// Reconstruct a magazine from a published record and link the
    /// publisher's relay into the local peer list.
    pub async fn subscribe(
        id: &str,
        reader: Arc<dyn ChainReader>,
        store: Arc<dyn GraphStore>,
    ) -> Result<Self, MagazineError> {
        let value = store.get(&[id]).await?.ok_or_else(|| {
            MagazineError::StoreUnavailable(format!("no magazine published at '{id}'"))
        })?;
        let record: MagazineRecord = serde_json::from_value(value).map_err(|e| {
            MagazineError::StoreUnavailable(format!("malformed magazine record at '{id}': {e}"))
        })?;

        store.append(&[PEERS_PATH], json!(record.url)).await?;

        let config = SyncConfig {
            name: record.name,
            address: record.address,
            network_id: record.network_id,
            abi: record.abi,
            ..SyncConfig::default()
        };
        Self::new(config, reader, store)
    }

    /// Stream decoded events by name: existing entries first, then live
    /// additions as sync cycles append them.
    pub async fn events(&self, event_name: &str) -> Result<UnboundedReceiver<Value>, MagazineError> {
        self.store.watch(&[EVENTS_PATH, event_name]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_lowercases_and_dashes() {
        assert_eq!(Magazine::slug("My Magazine"), "my-magazine");
        assert_eq!(Magazine::slug("USDC  Ledger"), "usdc--ledger");
        assert_eq!(Magazine::slug("plain"), "plain");
    }

    #[test]
    fn record_serde_roundtrip() {
        let record = MagazineRecord {
            name: "My Magazine".into(),
            address: "0xabc".into(),
            network_id: 1,
            abi: vec!["event Ping()".into()],
            url: DEFAULT_RELAY_URL.into(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["networkId"], 1);
        let back: MagazineRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }
}
