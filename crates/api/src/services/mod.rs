// Path: crates/api/src/services/mod.rs
//! Service dispatch traits, lifecycle hooks and the capability interfaces
//! the invocation module depends on.

/// Account transfer and burn primitives plus the module pseudo-accounts.
pub mod bank;
/// Service-definition and role registries.
pub mod registry;

use crate::state::StateAccess;
use crate::transaction::TxContext;
use svcnet_types::error::ServiceError;

/// A ledger-resident service addressable by versioned method strings.
pub trait LedgerService: Send + Sync {
    /// The unique identifier of this service.
    fn id(&self) -> &str;

    /// Dispatches one service call. `params` carries the canonically encoded
    /// parameter struct of the method; the return value is the canonically
    /// encoded result, empty for unit results.
    fn handle_service_call(
        &self,
        state: &mut dyn StateAccess,
        method: &str,
        params: &[u8],
        ctx: &TxContext,
    ) -> Result<Vec<u8>, ServiceError>;
}

/// A hook the block driver invokes once at every height boundary, after all
/// transactions of the block have executed.
pub trait OnEndBlock: Send + Sync {
    /// Runs the service's end-of-block processing.
    fn on_end_block(
        &self,
        state: &mut dyn StateAccess,
        ctx: &TxContext,
    ) -> Result<(), ServiceError>;
}
