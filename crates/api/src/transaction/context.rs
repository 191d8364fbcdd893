// Path: crates/api/src/transaction/context.rs
//! Defines the stable context for transaction execution.

use svcnet_types::app::{AccountId, ChainId};

/// Provides stable, read-only context to services during execution.
///
/// Execution is single-threaded and fully deterministic: every operation
/// runs sequentially within one block, so the context never changes while a
/// call is in flight.
#[derive(Debug, Clone)]
pub struct TxContext {
    /// The current block height being processed.
    pub block_height: u64,
    /// The deterministic timestamp of the current block, in seconds, taken
    /// from its header.
    pub block_timestamp: u64,
    /// The unique identifier of the chain for replay protection.
    pub chain_id: ChainId,
    /// The `AccountId` of the entity that signed the current transaction.
    /// This is the authoritative source for permission checks within
    /// services; signature verification happened upstream.
    pub signer_account_id: AccountId,
}
