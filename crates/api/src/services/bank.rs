// Path: crates/api/src/services/bank.rs
//! The account transfer/burn capability and the protocol-reserved module
//! accounts the invocation module moves value through.

use crate::state::StateAccess;
use svcnet_types::app::{AccountId, Coins};
use svcnet_types::error::ServiceError;

/// The pseudo-account holding fees escrowed for outstanding requests.
pub const REQUEST_ESCROW_ACCOUNT: AccountId = AccountId(*b"svcnet::module::request_escrow\0\0");
/// The pseudo-account accumulating the service fee tax.
pub const SERVICE_TAX_ACCOUNT: AccountId = AccountId(*b"svcnet::module::service_tax\0\0\0\0\0");
/// The pseudo-account holding provider binding deposits.
pub const SERVICE_DEPOSIT_ACCOUNT: AccountId = AccountId(*b"svcnet::module::service_deposit\0");

/// Balance transfer and burn primitives, addressed by opaque account ids.
///
/// The invocation module never touches balances directly; it moves value
/// between consumer, provider and the module accounts exclusively through
/// this interface, which the execution environment injects.
pub trait BankKeeper: Send + Sync {
    /// Moves `amount` from `from` to `to`. Fails with
    /// [`ServiceError::InsufficientFunds`] when `from` cannot cover it.
    fn send_coins(
        &self,
        state: &mut dyn StateAccess,
        from: &AccountId,
        to: &AccountId,
        amount: &Coins,
    ) -> Result<(), ServiceError>;

    /// Removes `amount` from circulation out of `from`.
    fn burn_coins(
        &self,
        state: &mut dyn StateAccess,
        from: &AccountId,
        amount: &Coins,
    ) -> Result<(), ServiceError>;
}
