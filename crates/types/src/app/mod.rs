// Path: crates/types/src/app/mod.rs
//! Core application-level data structures.

/// Coin and multi-denomination value arithmetic.
pub mod coin;
/// Canonical account and chain identifiers.
pub mod identity;
/// Request contexts, requests, responses, bindings and fee accruals.
pub mod invocation;

pub use coin::{Coin, Coins};
pub use identity::{AccountId, ChainId};
pub use invocation::{
    BatchTotal, ContextId, ContextState, IncomingFee, Params, RequestContext, RequestId,
    ReturnedFee, ServiceBinding, ServiceDefinition, SvcRequest, SvcResponse,
};
