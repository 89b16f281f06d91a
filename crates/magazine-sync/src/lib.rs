//! magazine-sync — incremental block-sync engine and the `Magazine` facade.
//!
//! # Architecture
//!
//! ```text
//! MagazineBuilder → SyncConfig → Magazine
//!                                    ├── SyncEngine       (poll loop, cycle scan)
//!                                    ├── LogDecoder       (topic0 → descriptor)
//!                                    ├── GraphCheckpointStore (next block to scan)
//!                                    └── GraphSink        (events/<name> fan-out)
//! ```

pub mod config;
pub mod engine;
pub mod magazine;

pub use config::{DecodePolicy, MagazineBuilder, SyncConfig};
pub use engine::{CycleReport, SyncEngine};
pub use magazine::{Magazine, MagazineRecord, PublishOptions, DEFAULT_RELAY_URL, PEERS_PATH};
