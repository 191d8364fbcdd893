// Path: crates/services/src/invocation/fees.rs
//! The fee ledger: provider earnings net of tax, consumer refunds, the tax
//! pool, and the bulk refund paths used when the chain winds down.
//!
//! Accrual records are created on first accrual, summed on later ones and
//! deleted on payout. The coins themselves sit in the escrow module account
//! the whole time; records only track who may claim what.

use crate::invocation::InvocationModule;
use svcnet_api::services::bank::{REQUEST_ESCROW_ACCOUNT, SERVICE_TAX_ACCOUNT};
use svcnet_api::state::StateAccess;
use svcnet_types::app::{AccountId, Coin, Coins, IncomingFee, RequestId, ReturnedFee};
use svcnet_types::codec;
use svcnet_types::error::{ServiceError, StateError};
use svcnet_types::keys;

impl InvocationModule {
    /// Reads a provider's pending earnings record.
    pub fn incoming_fee(
        &self,
        state: &dyn StateAccess,
        address: &AccountId,
    ) -> Result<Option<IncomingFee>, ServiceError> {
        match state.get(&keys::incoming_fee_key(address))? {
            Some(bytes) => codec::from_bytes_canonical(&bytes)
                .map(Some)
                .map_err(ServiceError::Codec),
            None => Ok(None),
        }
    }

    /// Accrues earned fees to a provider, net of the service fee tax.
    ///
    /// The tax share moves from escrow into the tax pool immediately; the
    /// remainder stays escrowed and is recorded against the provider.
    pub fn add_incoming_fee(
        &self,
        state: &mut dyn StateAccess,
        address: &AccountId,
        fee: &Coins,
    ) -> Result<(), ServiceError> {
        let params = self.params(&*state)?;
        let tax = Coins::new(
            fee.iter()
                .map(|c| {
                    Coin::new(
                        c.denom.clone(),
                        c.amount.saturating_mul(params.service_fee_tax_bp as u128) / 10_000,
                    )
                })
                .collect(),
        );
        self.bank
            .send_coins(state, &REQUEST_ESCROW_ACCOUNT, &SERVICE_TAX_ACCOUNT, &tax)?;
        let net = fee.safe_sub(&tax).ok_or_else(|| {
            ServiceError::InsufficientFunds(format!("tax {} exceeds the fee {}", tax, fee))
        })?;

        let accrued = match self.incoming_fee(&*state, address)? {
            Some(existing) => existing.coins.add(&net),
            None => net,
        };
        let record = IncomingFee {
            address: *address,
            coins: accrued,
        };
        let bytes = codec::to_bytes_canonical(&record).map_err(ServiceError::Codec)?;
        state.insert(&keys::incoming_fee_key(address), &bytes)?;
        Ok(())
    }

    /// Pays a provider's accrued earnings out of escrow and clears the
    /// record.
    pub fn withdraw_fee(
        &self,
        state: &mut dyn StateAccess,
        provider: &AccountId,
    ) -> Result<(), ServiceError> {
        let fee = self
            .incoming_fee(&*state, provider)?
            .ok_or(ServiceError::FeeNotFound(*provider))?;
        self.bank
            .send_coins(state, &REQUEST_ESCROW_ACCOUNT, provider, &fee.coins)?;
        state.delete(&keys::incoming_fee_key(provider))?;
        log::info!("paid out earned fees {} to provider {}", fee.coins, provider);
        Ok(())
    }

    /// Reads a consumer's pending refund record.
    pub fn returned_fee(
        &self,
        state: &dyn StateAccess,
        address: &AccountId,
    ) -> Result<Option<ReturnedFee>, ServiceError> {
        match state.get(&keys::returned_fee_key(address))? {
            Some(bytes) => codec::from_bytes_canonical(&bytes)
                .map(Some)
                .map_err(ServiceError::Codec),
            None => Ok(None),
        }
    }

    /// Accrues a refund to a consumer for a request that went unanswered.
    pub fn add_return_fee(
        &self,
        state: &mut dyn StateAccess,
        address: &AccountId,
        fee: &Coins,
    ) -> Result<(), ServiceError> {
        let accrued = match self.returned_fee(&*state, address)? {
            Some(existing) => existing.coins.add(fee),
            None => fee.clone(),
        };
        let record = ReturnedFee {
            address: *address,
            coins: accrued,
        };
        let bytes = codec::to_bytes_canonical(&record).map_err(ServiceError::Codec)?;
        state.insert(&keys::returned_fee_key(address), &bytes)?;
        Ok(())
    }

    /// Pays a consumer's accrued refunds out of escrow and clears the
    /// record.
    pub fn refund_fee(
        &self,
        state: &mut dyn StateAccess,
        consumer: &AccountId,
    ) -> Result<(), ServiceError> {
        let fee = self
            .returned_fee(&*state, consumer)?
            .ok_or(ServiceError::FeeNotFound(*consumer))?;
        self.bank
            .send_coins(state, &REQUEST_ESCROW_ACCOUNT, consumer, &fee.coins)?;
        state.delete(&keys::returned_fee_key(consumer))?;
        log::info!("refunded {} to consumer {}", fee.coins, consumer);
        Ok(())
    }

    /// Pays part of the tax pool to `destination`. Trustee-gated.
    pub fn withdraw_tax(
        &self,
        state: &mut dyn StateAccess,
        trustee: &AccountId,
        destination: &AccountId,
        amount: &Coins,
    ) -> Result<(), ServiceError> {
        if !self.roles.is_trustee(&*state, trustee)? {
            return Err(ServiceError::NotTrustee(*trustee));
        }
        self.bank
            .send_coins(state, &SERVICE_TAX_ACCOUNT, destination, amount)?;
        log::info!(
            "trustee {} withdrew {} of tax to {}",
            trustee,
            amount,
            destination
        );
        Ok(())
    }

    /// Pays out every pending consumer refund. Wind-down path: records are
    /// left in place, only the coins move.
    pub fn refund_returned_fees(&self, state: &mut dyn StateAccess) -> Result<(), ServiceError> {
        let fees: Vec<ReturnedFee> = Self::collect_fee_records(state, keys::RETURNED_FEE_PREFIX)?;
        for fee in fees {
            self.bank
                .send_coins(state, &REQUEST_ESCROW_ACCOUNT, &fee.address, &fee.coins)?;
            log::info!("refunded {} to consumer {}", fee.coins, fee.address);
        }
        Ok(())
    }

    /// Pays out every pending provider earning. Wind-down path.
    pub fn refund_incoming_fees(&self, state: &mut dyn StateAccess) -> Result<(), ServiceError> {
        let fees: Vec<IncomingFee> = Self::collect_fee_records(state, keys::INCOMING_FEE_PREFIX)?;
        for fee in fees {
            self.bank
                .send_coins(state, &REQUEST_ESCROW_ACCOUNT, &fee.address, &fee.coins)?;
            log::info!("paid out earned fees {} to provider {}", fee.coins, fee.address);
        }
        Ok(())
    }

    /// Refunds the escrowed fee of every still-active request to its
    /// consumer. Wind-down path.
    pub fn refund_service_fees(&self, state: &mut dyn StateAccess) -> Result<(), ServiceError> {
        let mut ids = Vec::new();
        for entry in state.prefix_scan(keys::ACTIVE_BY_EXPIRATION_PREFIX)? {
            let (key, value) = entry?;
            match RequestId::from_bytes(&value) {
                Some(id) => ids.push(id),
                None => {
                    return Err(StateError::InvalidValue(format!(
                        "malformed request index entry at key {}",
                        hex::encode(&key)
                    ))
                    .into());
                }
            }
        }
        for id in ids {
            let request = self.request(&*state, &id)?.ok_or_else(|| {
                StateError::InvalidValue(format!(
                    "active index entry for {} has no primary record",
                    id
                ))
            })?;
            self.bank.send_coins(
                state,
                &REQUEST_ESCROW_ACCOUNT,
                &request.consumer,
                &request.service_fee,
            )?;
            log::info!(
                "refunded the escrowed fee {} of request {} to consumer {}",
                request.service_fee,
                id,
                request.consumer
            );
        }
        Ok(())
    }

    fn collect_fee_records<T: parity_scale_codec::Decode>(
        state: &dyn StateAccess,
        prefix: &[u8],
    ) -> Result<Vec<T>, ServiceError> {
        let mut records = Vec::new();
        for entry in state.prefix_scan(prefix)? {
            let (_, value) = entry?;
            records.push(codec::from_bytes_canonical(&value).map_err(ServiceError::Codec)?);
        }
        Ok(records)
    }
}
