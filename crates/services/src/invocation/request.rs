// Path: crates/services/src/invocation/request.rs
//! Individual request dispatch, response matching and deadline expiration.
//!
//! A request lives in a primary record plus two id-only index entries: one
//! keyed by provider for "what must I answer" queries, one keyed by
//! expiration height so the end-of-slot sweep reads exactly the requests
//! that die now. Settling a request (response or expiry) removes both index
//! entries; the primary record stays behind as the audit trail.

use crate::invocation::InvocationModule;
use svcnet_api::services::bank::REQUEST_ESCROW_ACCOUNT;
use svcnet_api::state::StateAccess;
use svcnet_api::transaction::TxContext;
use svcnet_types::app::{AccountId, ChainId, Coins, RequestId, SvcRequest, SvcResponse};
use svcnet_types::codec;
use svcnet_types::error::{ServiceError, StateError};
use svcnet_types::keys::{self, INTRA_BLOCK_COUNTER_KEY};

impl InvocationModule {
    /// Creates and escrows a single request against one provider.
    ///
    /// The escrow transfer is attempted before anything is written; the
    /// counter successor, primary record and both index entries then land in
    /// one atomic batch, so a failed operation leaves no trace.
    #[allow(clippy::too_many_arguments)]
    pub fn add_request(
        &self,
        state: &mut dyn StateAccess,
        ctx: &TxContext,
        def_chain_id: ChainId,
        def_name: String,
        bind_chain_id: ChainId,
        consumer: AccountId,
        provider: AccountId,
        method_id: i16,
        input: Vec<u8>,
        service_fee: Coins,
        profiling: bool,
    ) -> Result<SvcRequest, ServiceError> {
        let binding = self
            .service_binding(&*state, &def_name, &provider)?
            .ok_or_else(|| ServiceError::BindingNotFound {
                def_name: def_name.clone(),
                provider,
            })?;
        if !binding.available {
            return Err(ServiceError::BindingUnavailable);
        }
        if profiling && !self.roles.is_profiler(&*state, &consumer)? {
            return Err(ServiceError::NotProfiler(consumer));
        }

        let params = self.params(&*state)?;
        let counter = self.intra_block_counter(&*state)?;
        let request = SvcRequest {
            def_chain_id,
            def_name,
            bind_chain_id,
            request_chain_id: ctx.chain_id.clone(),
            consumer,
            provider,
            method_id,
            input,
            service_fee,
            profiling,
            request_height: ctx.block_height,
            expiration_height: ctx.block_height + params.max_request_timeout,
            counter,
        };

        self.bank.send_coins(
            state,
            &request.consumer,
            &REQUEST_ESCROW_ACCOUNT,
            &request.service_fee,
        )?;

        let id = request.request_id();
        let record = codec::to_bytes_canonical(&request).map_err(ServiceError::Codec)?;
        let next_counter =
            codec::to_bytes_canonical(&counter.wrapping_add(1)).map_err(ServiceError::Codec)?;
        let id_bytes = id.to_bytes().to_vec();
        state.batch_apply(
            &[
                (INTRA_BLOCK_COUNTER_KEY.to_vec(), next_counter),
                (keys::request_record_key(&id), record),
                (
                    keys::active_by_provider_key(&request.provider, &id),
                    id_bytes.clone(),
                ),
                (keys::active_by_expiration_key(&id), id_bytes),
            ],
            &[],
        )?;
        log::debug!("created request {} for provider {}", id, request.provider);
        Ok(request)
    }

    /// Reads a primary request record, settled or not.
    pub fn request(
        &self,
        state: &dyn StateAccess,
        id: &RequestId,
    ) -> Result<Option<SvcRequest>, ServiceError> {
        match state.get(&keys::request_record_key(id))? {
            Some(bytes) => codec::from_bytes_canonical(&bytes)
                .map(Some)
                .map_err(ServiceError::Codec),
            None => Ok(None),
        }
    }

    /// Reads a request only while it is still awaiting its response.
    pub fn active_request(
        &self,
        state: &dyn StateAccess,
        id: &RequestId,
    ) -> Result<Option<SvcRequest>, ServiceError> {
        if state.get(&keys::active_by_expiration_key(id))?.is_none() {
            return Ok(None);
        }
        match self.request(state, id)? {
            Some(request) => Ok(Some(request)),
            None => Err(StateError::InvalidValue(format!(
                "active index entry for {} has no primary record",
                id
            ))
            .into()),
        }
    }

    /// Records the provider's answer to an active request.
    ///
    /// The fee accrues to the provider net of tax, the response is persisted
    /// and both active index entries are removed; a second response for the
    /// same request therefore fails as not active. A mismatched provider
    /// leaves the request untouched.
    pub fn add_response(
        &self,
        state: &mut dyn StateAccess,
        request_chain_id: ChainId,
        request_id: &RequestId,
        provider: AccountId,
        output: Vec<u8>,
        error: Vec<u8>,
    ) -> Result<SvcResponse, ServiceError> {
        let request = self
            .active_request(&*state, request_id)?
            .ok_or_else(|| ServiceError::RequestNotActive(request_id.to_string()))?;
        if provider != request.provider {
            return Err(ServiceError::MismatchedProvider(provider));
        }

        self.add_incoming_fee(state, &request.provider, &request.service_fee)?;

        let response = SvcResponse {
            request_chain_id,
            request_id: *request_id,
            provider: request.provider,
            consumer: request.consumer,
            output,
            error,
        };
        let bytes = codec::to_bytes_canonical(&response).map_err(ServiceError::Codec)?;
        state.batch_apply(
            &[(
                keys::response_key(&response.request_chain_id, request_id),
                bytes,
            )],
            &[
                keys::active_by_provider_key(&request.provider, request_id),
                keys::active_by_expiration_key(request_id),
            ],
        )?;
        log::debug!(
            "settled request {} with a response from provider {}",
            request_id,
            response.provider
        );
        Ok(response)
    }

    /// Reads a stored response.
    pub fn response(
        &self,
        state: &dyn StateAccess,
        request_chain_id: &ChainId,
        id: &RequestId,
    ) -> Result<Option<SvcResponse>, ServiceError> {
        match state.get(&keys::response_key(request_chain_id, id))? {
            Some(bytes) => codec::from_bytes_canonical(&bytes)
                .map(Some)
                .map_err(ServiceError::Codec),
            None => Ok(None),
        }
    }

    /// The ids of every request a provider still has to answer.
    pub fn active_requests_by_provider(
        &self,
        state: &dyn StateAccess,
        provider: &AccountId,
    ) -> Result<Vec<RequestId>, ServiceError> {
        let prefix = keys::active_by_provider_prefix(provider);
        Self::collect_ids(state, &prefix)
    }

    /// The ids of every active request expiring exactly at `height`, in
    /// FIFO deadline order.
    pub fn expiring_requests(
        &self,
        state: &dyn StateAccess,
        height: u64,
    ) -> Result<Vec<RequestId>, ServiceError> {
        let prefix = keys::active_by_expiration_prefix(height);
        Self::collect_ids(state, &prefix)
    }

    fn collect_ids(state: &dyn StateAccess, prefix: &[u8]) -> Result<Vec<RequestId>, ServiceError> {
        let mut ids = Vec::new();
        for entry in state.prefix_scan(prefix)? {
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
        Ok(ids)
    }

    /// Settles every request whose deadline is the current height: the
    /// escrowed fee accrues back to the consumer and the request leaves the
    /// active set. The primary record is kept.
    pub fn process_expired_requests(
        &self,
        state: &mut dyn StateAccess,
        ctx: &TxContext,
    ) -> Result<(), ServiceError> {
        let ids = self.expiring_requests(&*state, ctx.block_height)?;
        for id in ids {
            let request = self.request(&*state, &id)?.ok_or_else(|| {
                StateError::InvalidValue(format!(
                    "expiring index entry for {} has no primary record",
                    id
                ))
            })?;
            self.add_return_fee(state, &request.consumer, &request.service_fee)?;
            state.batch_apply(
                &[],
                &[
                    keys::active_by_provider_key(&request.provider, &id),
                    keys::active_by_expiration_key(&id),
                ],
            )?;
            log::debug!(
                "expired request {}, fee {} returned to consumer {}",
                id,
                request.service_fee,
                request.consumer
            );
        }
        Ok(())
    }
}
