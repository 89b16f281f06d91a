//! Sync configuration and builder.

use serde::{Deserialize, Serialize};

/// What to do when a single log cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodePolicy {
    /// Skip the log, record the failure, continue with its siblings.
    #[default]
    SkipLog,
    /// Fail the cycle without advancing the checkpoint.
    AbortCycle,
}

/// Configuration for a magazine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Human-readable magazine name (slugged into the publish path).
    pub name: String,
    /// Contract address whose transactions are scanned.
    pub address: String,
    /// Chain network id, recorded in the published magazine.
    pub network_id: u64,
    /// Human-readable ABI fragments; only `event …` declarations are used
    /// for decoding, the full list is published as-is.
    pub abi: Vec<String>,
    /// Poll interval between sync cycles (milliseconds).
    pub poll_interval_ms: u64,
    /// How many block fetches to keep in flight per cycle.
    pub fetch_concurrency: usize,
    /// Per-log decode failure policy.
    pub decode_policy: DecodePolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            network_id: 1,
            abi: vec![],
            poll_interval_ms: 5000,
            fetch_concurrency: 4,
            decode_policy: DecodePolicy::SkipLog,
        }
    }
}

/// Fluent builder for `SyncConfig`.
///
/// # Example
///
/// ```rust
/// use magazine_sync::MagazineBuilder;
///
/// let config = MagazineBuilder::new()
///     .name("USDC Ledger")
///     .address("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48")
///     .network_id(1)
///     .event("event Transfer(address indexed from, address indexed to, uint256 value)")
///     .poll_interval_ms(2000)
///     .build_config();
/// ```
#[derive(Debug, Default)]
pub struct MagazineBuilder {
    config: SyncConfig,
}

impl MagazineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the magazine name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set the target contract address.
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.config.address = address.into();
        self
    }

    /// Set the chain network id.
    pub fn network_id(mut self, id: u64) -> Self {
        self.config.network_id = id;
        self
    }

    /// Replace the ABI fragment list.
    pub fn abi(mut self, fragments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.config.abi = fragments.into_iter().map(Into::into).collect();
        self
    }

    /// Append one ABI fragment.
    pub fn event(mut self, fragment: impl Into<String>) -> Self {
        self.config.abi.push(fragment.into());
        self
    }

    /// Set the poll interval in milliseconds.
    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poll_interval_ms = ms;
        self
    }

    /// Set the number of in-flight block fetches per cycle.
    pub fn fetch_concurrency(mut self, n: usize) -> Self {
        self.config.fetch_concurrency = n;
        self
    }

    /// Set the per-log decode failure policy.
    pub fn decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.config.decode_policy = policy;
        self
    }

    /// Build the `SyncConfig`.
    pub fn build_config(self) -> SyncConfig {
        self.config
    }
}
