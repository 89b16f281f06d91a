//! Shared types for the sync pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─── Chain data ──────────────────────────────────────────────────────────────

/// A transaction as it appears in a block body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction hash (`0x…`).
    pub hash: String,
    /// Recipient address; `None` for contract creations.
    pub to: Option<String>,
    /// Position of the transaction within its block.
    pub index: u32,
}

impl Transaction {
    /// Returns `true` if this transaction is addressed to `address`
    /// (hex addresses compare case-insensitively).
    pub fn is_to(&self, address: &str) -> bool {
        self.to
            .as_deref()
            .is_some_and(|to| to.eq_ignore_ascii_case(address))
    }
}

/// A block with full transaction bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block number.
    pub number: u64,
    /// Block hash (`0x…`).
    pub hash: String,
    /// Transactions in block order.
    pub transactions: Vec<Transaction>,
}

/// A raw, undecoded log record from a transaction receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLog {
    /// Contract address that emitted the log.
    pub address: String,
    /// topics[0] is the event signature hash; additional topics are
    /// indexed parameters. Hex-encoded with `0x` prefix.
    pub topics: Vec<String>,
    /// ABI-encoded non-indexed parameters, hex-encoded with `0x` prefix.
    pub data: String,
    /// Block number.
    pub block_number: u64,
    /// Transaction hash.
    pub tx_hash: String,
    /// Log index within the block.
    pub log_index: u32,
}

impl RawLog {
    /// Returns topics[0] — the event signature hash — if present.
    pub fn signature_topic(&self) -> Option<&str> {
        self.topics.first().map(|s| s.as_str())
    }
}

/// A transaction receipt — the carrier of a transaction's logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Transaction hash.
    pub tx_hash: String,
    /// Block number.
    pub block_number: u64,
    /// Logs emitted by this transaction.
    pub logs: Vec<RawLog>,
}

// ─── DecodedEvent ────────────────────────────────────────────────────────────

/// A decoded contract event — the output of the decoder and the payload
/// handed to the sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedEvent {
    /// The event name (e.g. `"Transfer"`).
    pub name: String,
    /// Decoded arguments in declaration order, as (name, value) pairs.
    pub args: Vec<(String, Value)>,
    /// Block number.
    pub block_number: u64,
    /// Transaction hash.
    pub tx_hash: String,
    /// Log index within the block.
    pub log_index: u32,
}

impl DecodedEvent {
    /// Get an argument value by name.
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// The event rendered as a JSON object for storage:
    /// `{name, args: {…}, blockNumber, txHash, logIndex}`.
    pub fn to_json(&self) -> Value {
        let args: serde_json::Map<String, Value> =
            self.args.iter().map(|(n, v)| (n.clone(), v.clone())).collect();
        serde_json::json!({
            "name": self.name,
            "args": args,
            "blockNumber": self.block_number,
            "txHash": self.tx_hash,
            "logIndex": self.log_index,
        })
    }
}
