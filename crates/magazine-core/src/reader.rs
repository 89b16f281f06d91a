//! Chain reader trait — the RPC-facing collaborator.
//!
//! The sync engine only needs three calls: the current head, a block with
//! full transaction bodies, and a transaction receipt. Any JSON-RPC provider
//! wrapper can implement this; the engine treats every failure as
//! [`MagazineError::ChainUnavailable`] and retries on the next cycle.

use async_trait::async_trait;

use crate::error::MagazineError;
use crate::types::{Block, Receipt};

/// Trait for fetching chain data from an RPC provider.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// The latest block height the provider knows about.
    async fn latest_block_height(&self) -> Result<u64, MagazineError>;

    /// Fetch a block by number, including full transaction bodies.
    async fn get_block(&self, number: u64) -> Result<Block, MagazineError>;

    /// Fetch the receipt for a transaction.
    async fn get_transaction_receipt(&self, tx_hash: &str) -> Result<Receipt, MagazineError>;
}
