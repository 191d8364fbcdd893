// Path: crates/services/src/invocation/context.rs
//! Request context lifecycle: creation, update, pause/start/kill, and the
//! height-keyed trigger queue that materializes batches at slot boundaries.
//!
//! Contexts are never physically deleted. Termination is modeled as "paused
//! with the batch total clamped to the batches already issued", which keeps
//! the audit trail intact and makes `kill` idempotent in effect.

use crate::invocation::{CreateContextParams, InvocationModule};
use svcnet_api::state::StateAccess;
use svcnet_api::transaction::TxContext;
use svcnet_types::app::{
    AccountId, BatchTotal, Coins, ContextId, ContextState, RequestContext,
};
use svcnet_types::codec;
use svcnet_types::error::{ServiceError, StateError};
use svcnet_types::keys;

impl InvocationModule {
    /// Reads a request context record.
    pub fn request_context(
        &self,
        state: &dyn StateAccess,
        id: &ContextId,
    ) -> Result<Option<RequestContext>, ServiceError> {
        match state.get(&keys::context_record_key(id))? {
            Some(bytes) => codec::from_bytes_canonical(&bytes)
                .map(Some)
                .map_err(ServiceError::Codec),
            None => Ok(None),
        }
    }

    /// Persists a request context record.
    pub fn set_request_context(
        &self,
        state: &mut dyn StateAccess,
        id: &ContextId,
        context: &RequestContext,
    ) -> Result<(), ServiceError> {
        let bytes = codec::to_bytes_canonical(context).map_err(ServiceError::Codec)?;
        state.insert(&keys::context_record_key(id), &bytes)?;
        Ok(())
    }

    fn must_request_context(
        &self,
        state: &dyn StateAccess,
        id: &ContextId,
    ) -> Result<RequestContext, ServiceError> {
        self.request_context(state, id)?
            .ok_or_else(|| ServiceError::ContextNotFound(id.to_string()))
    }

    /// Creates a request context owned by `consumer`.
    ///
    /// Zero-valued knobs select defaults: a zero timeout becomes the module
    /// maximum, a zero frequency on a repeated context becomes the timeout.
    /// Non-repeated contexts have frequency and total forced to zero so a
    /// single stored shape covers both flavors. A context created in the
    /// running state has its first batch scheduled for the creation height.
    pub fn create_request_context(
        &self,
        state: &mut dyn StateAccess,
        ctx: &TxContext,
        consumer: AccountId,
        params: CreateContextParams,
    ) -> Result<ContextId, ServiceError> {
        let definition = self
            .registry
            .definition(&*state, &params.service_name)?
            .ok_or_else(|| {
                ServiceError::UnknownServiceDefinition(params.service_name.clone())
            })?;
        self.registry.validate_input(&definition, &params.input)?;

        if params.providers.len() < params.response_threshold as usize {
            return Err(ServiceError::InvalidProviders(format!(
                "{} providers cannot satisfy a response threshold of {}",
                params.providers.len(),
                params.response_threshold
            )));
        }

        let module_params = self.params(&*state)?;
        let mut timeout = params.timeout;
        if timeout > module_params.max_request_timeout {
            return Err(ServiceError::InvalidTimeout {
                timeout,
                max: module_params.max_request_timeout,
            });
        }
        if timeout == 0 {
            timeout = module_params.max_request_timeout;
        }

        let (frequency, total) = if params.repeated {
            let frequency = if params.repeated_frequency == 0 {
                timeout
            } else {
                params.repeated_frequency
            };
            if frequency < timeout {
                return Err(ServiceError::InvalidFrequency { frequency, timeout });
            }
            (frequency, params.repeated_total)
        } else {
            (0, BatchTotal::Bounded(0))
        };

        let context = RequestContext {
            service_name: params.service_name,
            providers: params.providers,
            consumer,
            input: params.input,
            service_fee_cap: params.service_fee_cap,
            timeout,
            repeated: params.repeated,
            repeated_frequency: frequency,
            repeated_total: total,
            batch_counter: 0,
            state: params.initial_state,
            response_threshold: params.response_threshold,
            response_handler: params.response_handler,
        };

        let counter = self.next_intra_block_counter(state)?;
        let id = ContextId::new(ctx.block_height, counter);
        self.set_request_context(state, &id, &context)?;

        if context.state == ContextState::Running {
            self.add_new_batch_trigger(state, ctx.block_height, &id)?;
        }
        log::info!(
            "created request context {} for service '{}'",
            id,
            context.service_name
        );
        Ok(id)
    }

    /// Updates the mutable fields of a repeated context. `None` fields are
    /// left unchanged.
    pub fn update_request_context(
        &self,
        state: &mut dyn StateAccess,
        id: &ContextId,
        providers: Option<Vec<AccountId>>,
        service_fee_cap: Option<Coins>,
        repeated_frequency: Option<u64>,
        repeated_total: Option<BatchTotal>,
    ) -> Result<(), ServiceError> {
        let mut context = self.must_request_context(&*state, id)?;
        if !context.repeated {
            return Err(ServiceError::NonRepeatedContext);
        }
        if let Some(providers) = &providers {
            if providers.len() < context.response_threshold as usize {
                return Err(ServiceError::InvalidProviders(format!(
                    "{} providers cannot satisfy a response threshold of {}",
                    providers.len(),
                    context.response_threshold
                )));
            }
        }
        if let Some(frequency) = repeated_frequency {
            if frequency < context.timeout {
                return Err(ServiceError::InvalidFrequency {
                    frequency,
                    timeout: context.timeout,
                });
            }
        }
        if let Some(BatchTotal::Bounded(total)) = repeated_total {
            if total <= context.batch_counter {
                return Err(ServiceError::InvalidTotal {
                    total,
                    batch_counter: context.batch_counter,
                });
            }
        }

        if let Some(providers) = providers {
            context.providers = providers;
        }
        if let Some(cap) = service_fee_cap {
            context.service_fee_cap = cap;
        }
        if let Some(frequency) = repeated_frequency {
            context.repeated_frequency = frequency;
        }
        if let Some(total) = repeated_total {
            context.repeated_total = total;
        }
        self.set_request_context(state, id, &context)
    }

    /// Suspends batch issuance of a running repeated context.
    pub fn pause_request_context(
        &self,
        state: &mut dyn StateAccess,
        id: &ContextId,
    ) -> Result<(), ServiceError> {
        let mut context = self.must_request_context(&*state, id)?;
        if !context.repeated {
            return Err(ServiceError::NonRepeatedContext);
        }
        if context.state != ContextState::Running {
            return Err(ServiceError::ContextNotRunning);
        }
        context.state = ContextState::Paused;
        self.delete_new_batch_trigger(state, id)?;
        self.set_request_context(state, id, &context)
    }

    /// Resumes a paused repeated context, scheduling its next batch one full
    /// frequency interval out.
    pub fn start_request_context(
        &self,
        state: &mut dyn StateAccess,
        ctx: &TxContext,
        id: &ContextId,
    ) -> Result<(), ServiceError> {
        let mut context = self.must_request_context(&*state, id)?;
        if !context.repeated {
            return Err(ServiceError::NonRepeatedContext);
        }
        if context.state != ContextState::Paused {
            return Err(ServiceError::ContextNotPaused);
        }
        context.state = ContextState::Running;
        self.add_new_batch_trigger(state, ctx.block_height + context.repeated_frequency, id)?;
        self.set_request_context(state, id, &context)
    }

    /// Terminates a repeated context: paused, with the batch total clamped
    /// to the batches already issued. Starting it again later succeeds but
    /// the exhausted total keeps the batch sweep from issuing anything.
    pub fn kill_request_context(
        &self,
        state: &mut dyn StateAccess,
        id: &ContextId,
    ) -> Result<(), ServiceError> {
        let mut context = self.must_request_context(&*state, id)?;
        if !context.repeated {
            return Err(ServiceError::NonRepeatedContext);
        }
        context.state = ContextState::Paused;
        context.repeated_total = BatchTotal::Bounded(context.batch_counter);
        self.set_request_context(state, id, &context)?;
        log::info!("killed request context {}", id);
        Ok(())
    }

    /// Schedules a batch for `id` at `trigger_height`, replacing any pending
    /// trigger. A context holds at most one pending trigger.
    pub fn add_new_batch_trigger(
        &self,
        state: &mut dyn StateAccess,
        trigger_height: u64,
        id: &ContextId,
    ) -> Result<(), ServiceError> {
        self.delete_new_batch_trigger(state, id)?;
        state.batch_apply(
            &[
                (
                    keys::context_trigger_key(trigger_height, id),
                    id.to_bytes().to_vec(),
                ),
                (
                    keys::context_trigger_of_key(id),
                    trigger_height.to_be_bytes().to_vec(),
                ),
            ],
            &[],
        )?;
        Ok(())
    }

    /// Removes the pending trigger of `id`, if any.
    pub fn delete_new_batch_trigger(
        &self,
        state: &mut dyn StateAccess,
        id: &ContextId,
    ) -> Result<(), ServiceError> {
        let of_key = keys::context_trigger_of_key(id);
        let Some(bytes) = state.get(&of_key)? else {
            return Ok(());
        };
        let height = u64::from_be_bytes(bytes.as_slice().try_into().map_err(|_| {
            StateError::InvalidValue("malformed trigger back-pointer".into())
        })?);
        state.batch_apply(&[], &[keys::context_trigger_key(height, id), of_key])?;
        Ok(())
    }

    /// Pops every trigger due at the current height and materializes the
    /// corresponding batches.
    pub fn sweep_batch_triggers(
        &self,
        state: &mut dyn StateAccess,
        ctx: &TxContext,
    ) -> Result<(), ServiceError> {
        let prefix = keys::context_trigger_prefix(ctx.block_height);
        let mut due = Vec::new();
        for entry in state.prefix_scan(&prefix)? {
            let (key, value) = entry?;
            match ContextId::from_bytes(&value) {
                Some(id) => due.push(id),
                None => {
                    return Err(StateError::InvalidValue(format!(
                        "malformed trigger entry at key {}",
                        hex::encode(&key)
                    ))
                    .into());
                }
            }
        }

        for id in due {
            let of_key = keys::context_trigger_of_key(&id);
            let mut deletes = vec![keys::context_trigger_key(ctx.block_height, &id)];
            // A stale trigger must not clear a newer back-pointer.
            if let Some(pointer) = state.get(&of_key)? {
                if pointer == ctx.block_height.to_be_bytes() {
                    deletes.push(of_key);
                }
            }
            state.batch_apply(&[], &deletes)?;
            self.materialize_batch(state, ctx, &id)?;
        }
        Ok(())
    }

    /// Issues one batch for a context: one request per candidate provider.
    ///
    /// The sweep guard re-checks state and exhaustion here because a trigger
    /// can outlive a kill. Provider-scoped failures (missing or disabled
    /// binding, underfunded consumer) skip that provider and never fail the
    /// batch. A repeated context with capacity left is re-enqueued one
    /// frequency interval out.
    fn materialize_batch(
        &self,
        state: &mut dyn StateAccess,
        ctx: &TxContext,
        id: &ContextId,
    ) -> Result<(), ServiceError> {
        let Some(mut context) = self.request_context(&*state, id)? else {
            log::warn!("dropping batch trigger for unknown context {}", id);
            return Ok(());
        };
        if context.state != ContextState::Running || context.batches_exhausted() {
            log::debug!("skipping batch for inactive context {}", id);
            return Ok(());
        }

        let mut issued = 0u32;
        for provider in context.providers.clone() {
            let result = self.add_request(
                state,
                ctx,
                ctx.chain_id.clone(),
                context.service_name.clone(),
                ctx.chain_id.clone(),
                context.consumer,
                provider,
                0,
                context.input.clone(),
                context.service_fee_cap.clone(),
                false,
            );
            match result {
                Ok(_) => issued += 1,
                Err(err) => {
                    log::warn!(
                        "skipping provider {} in batch for context {}: {}",
                        provider,
                        id,
                        err
                    );
                }
            }
        }

        context.batch_counter += 1;
        self.set_request_context(state, id, &context)?;
        if context.repeated && !context.batches_exhausted() {
            self.add_new_batch_trigger(
                state,
                ctx.block_height + context.repeated_frequency,
                id,
            )?;
        }
        log::info!(
            "issued batch {} for request context {} ({} of {} providers)",
            context.batch_counter,
            id,
            issued,
            context.providers.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invocation::tests::{
        base_context_params, consumer, other_provider, provider, seed_binding, test_module,
    };
    use svcnet_test_utils::{coins, tx_context, MemoryState, StateBank};

    fn has_trigger(state: &MemoryState, id: &ContextId) -> bool {
        state
            .get(&keys::context_trigger_of_key(id))
            .unwrap()
            .is_some()
    }

    fn trigger_height(state: &MemoryState, id: &ContextId) -> u64 {
        let bytes = state
            .get(&keys::context_trigger_of_key(id))
            .unwrap()
            .expect("pending trigger");
        u64::from_be_bytes(bytes.as_slice().try_into().unwrap())
    }

    #[test]
    fn test_create_applies_defaults() {
        let module = test_module();
        let mut state = MemoryState::new();
        let ctx = tx_context(10, consumer());

        // Zero timeout selects the module maximum; zero frequency selects
        // the timeout.
        let mut params = base_context_params();
        params.timeout = 0;
        params.repeated_frequency = 0;
        let id = module
            .create_request_context(&mut state, &ctx, consumer(), params)
            .unwrap();
        let context = module.request_context(&state, &id).unwrap().unwrap();
        assert_eq!(context.timeout, 100);
        assert_eq!(context.repeated_frequency, 100);
        assert_eq!(context.batch_counter, 0);
        assert_eq!(context.state, ContextState::Paused);
        assert!(!has_trigger(&state, &id));
    }

    #[test]
    fn test_create_zeroes_non_repeated_fields() {
        let module = test_module();
        let mut state = MemoryState::new();
        let ctx = tx_context(10, consumer());

        let mut params = base_context_params();
        params.repeated = false;
        params.repeated_frequency = 77;
        params.repeated_total = BatchTotal::Unbounded;
        let id = module
            .create_request_context(&mut state, &ctx, consumer(), params)
            .unwrap();
        let context = module.request_context(&state, &id).unwrap().unwrap();
        assert_eq!(context.repeated_frequency, 0);
        assert_eq!(context.repeated_total, BatchTotal::Bounded(0));
    }

    #[test]
    fn test_create_validations() {
        let module = test_module();
        let mut state = MemoryState::new();
        let ctx = tx_context(10, consumer());

        let mut params = base_context_params();
        params.service_name = "nonexistent".into();
        let err = module
            .create_request_context(&mut state, &ctx, consumer(), params)
            .unwrap_err();
        assert!(matches!(err, ServiceError::UnknownServiceDefinition(_)));

        let mut params = base_context_params();
        params.input = b"not json".to_vec();
        let err = module
            .create_request_context(&mut state, &ctx, consumer(), params)
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRequestInput(_)));

        let mut params = base_context_params();
        params.timeout = 101;
        let err = module
            .create_request_context(&mut state, &ctx, consumer(), params)
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::InvalidTimeout { timeout: 101, max: 100 }
        ));

        let mut params = base_context_params();
        params.repeated_frequency = 49;
        let err = module
            .create_request_context(&mut state, &ctx, consumer(), params)
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::InvalidFrequency { frequency: 49, timeout: 50 }
        ));

        let mut params = base_context_params();
        params.response_threshold = 2;
        let err = module
            .create_request_context(&mut state, &ctx, consumer(), params)
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidProviders(_)));

        // Nothing was persisted by the failed attempts.
        assert_eq!(module.intra_block_counter(&state).unwrap(), 0);
    }

    #[test]
    fn test_create_allocates_distinct_ids_within_slot() {
        let module = test_module();
        let mut state = MemoryState::new();
        let ctx = tx_context(10, consumer());

        let a = module
            .create_request_context(&mut state, &ctx, consumer(), base_context_params())
            .unwrap();
        let b = module
            .create_request_context(&mut state, &ctx, consumer(), base_context_params())
            .unwrap();
        assert_eq!(a, ContextId::new(10, 0));
        assert_eq!(b, ContextId::new(10, 1));
    }

    #[test]
    fn test_create_running_schedules_first_batch() {
        let module = test_module();
        let mut state = MemoryState::new();
        let ctx = tx_context(10, consumer());

        let mut params = base_context_params();
        params.initial_state = ContextState::Running;
        let id = module
            .create_request_context(&mut state, &ctx, consumer(), params)
            .unwrap();
        assert_eq!(trigger_height(&state, &id), 10);
    }

    #[test]
    fn test_update_rules() {
        let module = test_module();
        let mut state = MemoryState::new();
        let ctx = tx_context(10, consumer());

        let missing = ContextId::new(1, 0);
        let err = module
            .update_request_context(&mut state, &missing, None, None, None, None)
            .unwrap_err();
        assert!(matches!(err, ServiceError::ContextNotFound(_)));

        let mut params = base_context_params();
        params.repeated = false;
        let single = module
            .create_request_context(&mut state, &ctx, consumer(), params)
            .unwrap();
        let err = module
            .update_request_context(&mut state, &single, None, None, None, None)
            .unwrap_err();
        assert!(matches!(err, ServiceError::NonRepeatedContext));

        let id = module
            .create_request_context(&mut state, &ctx, consumer(), base_context_params())
            .unwrap();

        // Threshold is 1: an empty provider list cannot satisfy it.
        let err = module
            .update_request_context(&mut state, &id, Some(vec![]), None, None, None)
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidProviders(_)));

        let err = module
            .update_request_context(&mut state, &id, None, None, Some(49), None)
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidFrequency { .. }));

        let err = module
            .update_request_context(
                &mut state,
                &id,
                None,
                None,
                None,
                Some(BatchTotal::Bounded(0)),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::InvalidTotal { total: 0, batch_counter: 0 }
        ));

        // Partial update: only the supplied fields change.
        module
            .update_request_context(
                &mut state,
                &id,
                Some(vec![provider(), other_provider()]),
                None,
                Some(75),
                Some(BatchTotal::Unbounded),
            )
            .unwrap();
        let context = module.request_context(&state, &id).unwrap().unwrap();
        assert_eq!(context.providers, vec![provider(), other_provider()]);
        assert_eq!(context.service_fee_cap, coins("stake", 100));
        assert_eq!(context.repeated_frequency, 75);
        assert_eq!(context.repeated_total, BatchTotal::Unbounded);
    }

    #[test]
    fn test_pause_and_start_transitions() {
        let module = test_module();
        let mut state = MemoryState::new();
        let ctx = tx_context(10, consumer());

        let mut params = base_context_params();
        params.initial_state = ContextState::Running;
        let id = module
            .create_request_context(&mut state, &ctx, consumer(), params)
            .unwrap();

        let err = module
            .start_request_context(&mut state, &ctx, &id)
            .unwrap_err();
        assert!(matches!(err, ServiceError::ContextNotPaused));

        module.pause_request_context(&mut state, &id).unwrap();
        let context = module.request_context(&state, &id).unwrap().unwrap();
        assert_eq!(context.state, ContextState::Paused);
        assert!(!has_trigger(&state, &id));

        let err = module.pause_request_context(&mut state, &id).unwrap_err();
        assert!(matches!(err, ServiceError::ContextNotRunning));

        let restart_ctx = tx_context(40, consumer());
        module
            .start_request_context(&mut state, &restart_ctx, &id)
            .unwrap();
        let context = module.request_context(&state, &id).unwrap().unwrap();
        assert_eq!(context.state, ContextState::Running);
        // Next batch one frequency interval out from the restart height.
        assert_eq!(trigger_height(&state, &id), 100);
    }

    #[test]
    fn test_kill_clamps_total_and_pauses() {
        let module = test_module();
        let mut state = MemoryState::new();
        let ctx = tx_context(10, consumer());

        let mut params = base_context_params();
        params.initial_state = ContextState::Running;
        let id = module
            .create_request_context(&mut state, &ctx, consumer(), params)
            .unwrap();

        module.kill_request_context(&mut state, &id).unwrap();
        let context = module.request_context(&state, &id).unwrap().unwrap();
        assert_eq!(context.state, ContextState::Paused);
        assert_eq!(context.repeated_total, BatchTotal::Bounded(0));
        assert!(context.batches_exhausted());

        let mut params = base_context_params();
        params.repeated = false;
        let single = module
            .create_request_context(&mut state, &ctx, consumer(), params)
            .unwrap();
        let err = module.kill_request_context(&mut state, &single).unwrap_err();
        assert!(matches!(err, ServiceError::NonRepeatedContext));
    }

    #[test]
    fn test_sweep_materializes_batch_and_reschedules() {
        let module = test_module();
        let mut state = MemoryState::new();
        seed_binding(&mut state, &module, provider());
        StateBank::set_balance(&mut state, &consumer(), &coins("stake", 1_000));

        let ctx = tx_context(10, consumer());
        let mut params = base_context_params();
        params.initial_state = ContextState::Running;
        let id = module
            .create_request_context(&mut state, &ctx, consumer(), params)
            .unwrap();

        module.sweep_batch_triggers(&mut state, &ctx).unwrap();

        let context = module.request_context(&state, &id).unwrap().unwrap();
        assert_eq!(context.batch_counter, 1);
        let active = module
            .active_requests_by_provider(&state, &provider())
            .unwrap();
        assert_eq!(active.len(), 1);
        // Re-enqueued one frequency interval out.
        assert_eq!(trigger_height(&state, &id), 70);
        // The consumer paid one fee into escrow.
        assert_eq!(
            StateBank::balance(&state, &consumer()).amount_of("stake"),
            900
        );
    }

    #[test]
    fn test_sweep_skips_failing_providers() {
        let module = test_module();
        let mut state = MemoryState::new();
        // Only one of the two candidates has a binding.
        seed_binding(&mut state, &module, provider());
        StateBank::set_balance(&mut state, &consumer(), &coins("stake", 1_000));

        let ctx = tx_context(10, consumer());
        let mut params = base_context_params();
        params.initial_state = ContextState::Running;
        params.providers = vec![provider(), other_provider()];
        let id = module
            .create_request_context(&mut state, &ctx, consumer(), params)
            .unwrap();

        module.sweep_batch_triggers(&mut state, &ctx).unwrap();

        let context = module.request_context(&state, &id).unwrap().unwrap();
        assert_eq!(context.batch_counter, 1);
        assert_eq!(
            module
                .active_requests_by_provider(&state, &provider())
                .unwrap()
                .len(),
            1
        );
        assert!(module
            .active_requests_by_provider(&state, &other_provider())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_bounded_total_stops_rescheduling() {
        let module = test_module();
        let mut state = MemoryState::new();
        seed_binding(&mut state, &module, provider());
        StateBank::set_balance(&mut state, &consumer(), &coins("stake", 1_000));

        let ctx = tx_context(10, consumer());
        let mut params = base_context_params();
        params.initial_state = ContextState::Running;
        params.repeated_total = BatchTotal::Bounded(1);
        let id = module
            .create_request_context(&mut state, &ctx, consumer(), params)
            .unwrap();

        module.sweep_batch_triggers(&mut state, &ctx).unwrap();

        let context = module.request_context(&state, &id).unwrap().unwrap();
        assert_eq!(context.batch_counter, 1);
        assert!(context.batches_exhausted());
        assert!(!has_trigger(&state, &id));
    }

    #[test]
    fn test_start_after_kill_issues_no_batches() {
        let module = test_module();
        let mut state = MemoryState::new();
        seed_binding(&mut state, &module, provider());
        StateBank::set_balance(&mut state, &consumer(), &coins("stake", 1_000));

        let ctx = tx_context(10, consumer());
        let id = module
            .create_request_context(&mut state, &ctx, consumer(), base_context_params())
            .unwrap();
        module.kill_request_context(&mut state, &id).unwrap();

        // Restart is accepted, but the clamped total keeps the sweep from
        // issuing anything.
        module.start_request_context(&mut state, &ctx, &id).unwrap();
        let sweep_ctx = tx_context(70, consumer());
        module.sweep_batch_triggers(&mut state, &sweep_ctx).unwrap();

        let context = module.request_context(&state, &id).unwrap().unwrap();
        assert_eq!(context.batch_counter, 0);
        assert!(module
            .active_requests_by_provider(&state, &provider())
            .unwrap()
            .is_empty());
        assert!(!has_trigger(&state, &id));
    }
}
