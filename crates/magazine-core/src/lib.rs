//! magazine-core — shared types and collaborator traits for the magazine
//! event-log pipeline.
//!
//! # Architecture
//!
//! ```text
//! Magazine → SyncEngine
//!                ├── ChainReader      (RPC provider, external)
//!                ├── LogDecoder       (ABI fragment table, magazine-abi)
//!                ├── CheckpointStore  (scan cursor, graph-backed)
//!                └── EventSink        (decoded event fan-out, graph-backed)
//! ```
//!
//! The replicated graph store and the chain RPC provider are external
//! collaborators; this crate defines the traits the engine consumes and
//! in-memory/graph-backed implementations where the original system keeps
//! its state.

pub mod checkpoint;
pub mod error;
pub mod reader;
pub mod sink;
pub mod store;
pub mod types;

pub use checkpoint::{CheckpointStore, GraphCheckpointStore, CHECKPOINT_KEY};
pub use error::MagazineError;
pub use reader::ChainReader;
pub use sink::{EventSink, GraphSink, EVENTS_PATH};
pub use store::{GraphStore, MemoryGraphStore};
pub use types::{Block, DecodedEvent, RawLog, Receipt, Transaction};
