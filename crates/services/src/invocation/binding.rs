// Path: crates/services/src/invocation/binding.rs
//! Provider binding storage and deposit slashing.
//!
//! Bindings are owned by the provider registration flow; the invocation
//! module reads them to gate request dispatch and slashes their deposit when
//! a provider misbehaves.

use crate::invocation::InvocationModule;
use svcnet_api::services::bank::SERVICE_DEPOSIT_ACCOUNT;
use svcnet_api::state::StateAccess;
use svcnet_api::transaction::TxContext;
use svcnet_types::app::{AccountId, Coins, ServiceBinding};
use svcnet_types::codec;
use svcnet_types::error::ServiceError;
use svcnet_types::keys;

impl InvocationModule {
    /// Reads the binding of a provider for a service definition.
    pub fn service_binding(
        &self,
        state: &dyn StateAccess,
        def_name: &str,
        provider: &AccountId,
    ) -> Result<Option<ServiceBinding>, ServiceError> {
        match state.get(&keys::binding_key(def_name, provider))? {
            Some(bytes) => codec::from_bytes_canonical(&bytes)
                .map(Some)
                .map_err(ServiceError::Codec),
            None => Ok(None),
        }
    }

    /// Persists a binding.
    pub fn set_service_binding(
        &self,
        state: &mut dyn StateAccess,
        binding: &ServiceBinding,
    ) -> Result<(), ServiceError> {
        let bytes = codec::to_bytes_canonical(binding).map_err(ServiceError::Codec)?;
        state.insert(&keys::binding_key(&binding.def_name, &binding.provider), &bytes)?;
        Ok(())
    }

    /// Slashes a provider's deposit: the slashed coins are burned out of the
    /// deposit pool, and a binding whose remaining deposit falls below its
    /// minimum is disabled.
    ///
    /// Panics if the slash exceeds the posted deposit. Callers cap slash
    /// amounts at the deposit; exceeding it means consensus state is corrupt
    /// and the execution unit aborts.
    pub fn slash(
        &self,
        state: &mut dyn StateAccess,
        ctx: &TxContext,
        def_name: &str,
        provider: &AccountId,
        slash_coins: &Coins,
    ) -> Result<(), ServiceError> {
        let mut binding = self
            .service_binding(&*state, def_name, provider)?
            .ok_or_else(|| ServiceError::BindingNotFound {
                def_name: def_name.to_string(),
                provider: *provider,
            })?;

        let Some(remaining) = binding.deposit.safe_sub(slash_coins) else {
            panic!(
                "slash amount {} exceeds the deposit {} of provider {}",
                slash_coins, binding.deposit, provider
            );
        };
        binding.deposit = remaining;

        let params = self.params(&*state)?;
        if !binding
            .deposit
            .is_all_gte(&binding.min_deposit(params.min_deposit_multiple))
        {
            binding.available = false;
            binding.disabled_at = ctx.block_timestamp;
            log::warn!(
                "binding of provider {} for '{}' disabled, deposit below the minimum",
                provider,
                def_name
            );
        }

        self.bank
            .burn_coins(state, &SERVICE_DEPOSIT_ACCOUNT, slash_coins)?;
        self.set_service_binding(state, &binding)?;
        log::info!("slashed provider {} by {}", provider, slash_coins);
        Ok(())
    }
}
