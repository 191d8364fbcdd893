// Path: crates/services/src/invocation/mod.rs
//! The service invocation module.
//!
//! Orchestrates deadline-driven request/response exchanges between consumers
//! and providers with the fee flow held in escrow: recurring request
//! contexts issue batches of requests, providers answer before a deadline or
//! forfeit the fee back to the consumer, and earned fees accrue net of tax
//! until withdrawn.
//!
//! Everything here executes synchronously inside the deterministic state
//! transition; external concerns (definition registry, roles, token moves)
//! enter through capability traits so the module itself stays replayable.

use parity_scale_codec::{Decode, Encode};
use std::sync::Arc;
use svcnet_api::services::bank::BankKeeper;
use svcnet_api::services::registry::{RoleRegistry, ServiceDefinitionRegistry};
use svcnet_api::services::{LedgerService, OnEndBlock};
use svcnet_api::state::StateAccess;
use svcnet_api::transaction::TxContext;
use svcnet_types::app::{
    AccountId, BatchTotal, ChainId, Coins, ContextId, ContextState, Params, RequestId,
};
use svcnet_types::codec;
use svcnet_types::error::ServiceError;
use svcnet_types::keys::PARAMS_KEY;

mod binding;
mod context;
mod counter;
mod fees;
mod request;

/// The service identifier used for dispatch.
pub const SERVICE_ID: &str = "service_invocation";

/// Call parameters for `create_context@v1`.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct CreateContextParams {
    /// The target service definition name.
    pub service_name: String,
    /// Candidate providers for each batch.
    pub providers: Vec<AccountId>,
    /// Serialized call input.
    pub input: Vec<u8>,
    /// The fee escrowed per provider per batch.
    pub service_fee_cap: Coins,
    /// Blocks an individual request remains outstanding; zero selects the
    /// module maximum.
    pub timeout: u64,
    /// Whether the context issues batches repeatedly.
    pub repeated: bool,
    /// Blocks between batches; zero selects the timeout.
    pub repeated_frequency: u64,
    /// Cap on the number of batches.
    pub repeated_total: BatchTotal,
    /// The initial lifecycle state.
    pub initial_state: ContextState,
    /// Minimum responses per batch before the handler fires.
    pub response_threshold: u16,
    /// The module callback handling batch responses.
    pub response_handler: String,
}

/// Call parameters for `update_context@v1`. `None` fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct UpdateContextParams {
    /// The context to update.
    pub context_id: ContextId,
    /// Replacement provider list.
    pub providers: Option<Vec<AccountId>>,
    /// Replacement fee cap.
    pub service_fee_cap: Option<Coins>,
    /// Replacement batch frequency.
    pub repeated_frequency: Option<u64>,
    /// Replacement batch total.
    pub repeated_total: Option<BatchTotal>,
}

/// Call parameters for the pause/start/kill context operations.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ContextIdParams {
    /// The context operated on.
    pub context_id: ContextId,
}

/// Call parameters for `add_response@v1`.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct AddResponseParams {
    /// The chain the originating request came from.
    pub request_chain_id: ChainId,
    /// The hex form of the request id being answered.
    pub request_id: String,
    /// Serialized output payload.
    pub output: Vec<u8>,
    /// Serialized error payload, empty on success.
    pub error: Vec<u8>,
}

/// Call parameters for `withdraw_tax@v1`.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct WithdrawTaxParams {
    /// The account receiving the tax payout.
    pub destination: AccountId,
    /// The amount to pay out.
    pub amount: Coins,
}

/// The invocation module. Stateless itself: all persistent data lives in the
/// state store, all token movement goes through the bank capability.
pub struct InvocationModule {
    registry: Arc<dyn ServiceDefinitionRegistry>,
    roles: Arc<dyn RoleRegistry>,
    bank: Arc<dyn BankKeeper>,
}

impl InvocationModule {
    /// Creates the module over its external capabilities.
    pub fn new(
        registry: Arc<dyn ServiceDefinitionRegistry>,
        roles: Arc<dyn RoleRegistry>,
        bank: Arc<dyn BankKeeper>,
    ) -> Self {
        InvocationModule {
            registry,
            roles,
            bank,
        }
    }

    /// The current module parameters, falling back to defaults when genesis
    /// never wrote them.
    pub fn params(&self, state: &dyn StateAccess) -> Result<Params, ServiceError> {
        match state.get(PARAMS_KEY)? {
            Some(bytes) => codec::from_bytes_canonical(&bytes).map_err(ServiceError::Codec),
            None => Ok(Params::default()),
        }
    }

    /// Persists the module parameters.
    pub fn set_params(
        &self,
        state: &mut dyn StateAccess,
        params: &Params,
    ) -> Result<(), ServiceError> {
        let bytes = codec::to_bytes_canonical(params).map_err(ServiceError::Codec)?;
        state.insert(PARAMS_KEY, &bytes)?;
        Ok(())
    }

    /// Writes the genesis state: parameters and a zeroed operation counter.
    pub fn init_genesis(
        &self,
        state: &mut dyn StateAccess,
        params: &Params,
    ) -> Result<(), ServiceError> {
        self.set_params(state, params)?;
        self.set_intra_block_counter(state, 0)
    }
}

fn decode_params<T: Decode>(params: &[u8]) -> Result<T, ServiceError> {
    codec::from_bytes_canonical(params).map_err(ServiceError::Codec)
}

fn encode_result<T: Encode>(value: &T) -> Result<Vec<u8>, ServiceError> {
    codec::to_bytes_canonical(value).map_err(ServiceError::Codec)
}

impl LedgerService for InvocationModule {
    fn id(&self) -> &str {
        SERVICE_ID
    }

    fn handle_service_call(
        &self,
        state: &mut dyn StateAccess,
        method: &str,
        params: &[u8],
        ctx: &TxContext,
    ) -> Result<Vec<u8>, ServiceError> {
        match method {
            "create_context@v1" => {
                let p: CreateContextParams = decode_params(params)?;
                let id =
                    self.create_request_context(state, ctx, ctx.signer_account_id, p)?;
                encode_result(&id)
            }
            "update_context@v1" => {
                let p: UpdateContextParams = decode_params(params)?;
                self.update_request_context(
                    state,
                    &p.context_id,
                    p.providers,
                    p.service_fee_cap,
                    p.repeated_frequency,
                    p.repeated_total,
                )?;
                Ok(Vec::new())
            }
            "pause_context@v1" => {
                let p: ContextIdParams = decode_params(params)?;
                self.pause_request_context(state, &p.context_id)?;
                Ok(Vec::new())
            }
            "start_context@v1" => {
                let p: ContextIdParams = decode_params(params)?;
                self.start_request_context(state, ctx, &p.context_id)?;
                Ok(Vec::new())
            }
            "kill_context@v1" => {
                let p: ContextIdParams = decode_params(params)?;
                self.kill_request_context(state, &p.context_id)?;
                Ok(Vec::new())
            }
            "add_response@v1" => {
                let p: AddResponseParams = decode_params(params)?;
                let request_id: RequestId = p
                    .request_id
                    .parse()
                    .map_err(ServiceError::InvalidRequestId)?;
                self.add_response(
                    state,
                    p.request_chain_id,
                    &request_id,
                    ctx.signer_account_id,
                    p.output,
                    p.error,
                )?;
                Ok(Vec::new())
            }
            "withdraw_fee@v1" => {
                self.withdraw_fee(state, &ctx.signer_account_id)?;
                Ok(Vec::new())
            }
            "refund_fee@v1" => {
                self.refund_fee(state, &ctx.signer_account_id)?;
                Ok(Vec::new())
            }
            "withdraw_tax@v1" => {
                let p: WithdrawTaxParams = decode_params(params)?;
                self.withdraw_tax(state, &ctx.signer_account_id, &p.destination, &p.amount)?;
                Ok(Vec::new())
            }
            _ => Err(ServiceError::UnsupportedMethod(method.to_string())),
        }
    }
}

impl OnEndBlock for InvocationModule {
    /// Slot-boundary processing. Expirations settle before new batches are
    /// issued, so a request cannot expire in the slot it was created.
    fn on_end_block(
        &self,
        state: &mut dyn StateAccess,
        ctx: &TxContext,
    ) -> Result<(), ServiceError> {
        self.process_expired_requests(state, ctx)?;
        self.sweep_batch_triggers(state, ctx)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use svcnet_test_utils::{
        account, coins, tx_context, MemoryState, StateBank, StaticRoleRegistry,
        StaticServiceRegistry,
    };
    use svcnet_types::app::{ServiceBinding, ServiceDefinition};

    pub(crate) const ORACLE: &str = "oracle";

    pub(crate) fn consumer() -> AccountId {
        account(1)
    }

    pub(crate) fn provider() -> AccountId {
        account(2)
    }

    pub(crate) fn other_provider() -> AccountId {
        account(3)
    }

    pub(crate) fn profiler() -> AccountId {
        account(7)
    }

    pub(crate) fn trustee() -> AccountId {
        account(8)
    }

    pub(crate) fn test_module() -> InvocationModule {
        let registry = StaticServiceRegistry::new(vec![ServiceDefinition {
            name: ORACLE.into(),
            schemas: r#"{"input":"object"}"#.into(),
        }]);
        let roles = StaticRoleRegistry {
            profilers: [profiler()].into_iter().collect(),
            trustees: [trustee()].into_iter().collect(),
        };
        InvocationModule::new(Arc::new(registry), Arc::new(roles), Arc::new(StateBank))
    }

    /// A binding for `provider` with deposit 20000stake and pricing 10stake;
    /// with the default deposit multiple the minimum deposit is 10000stake.
    pub(crate) fn seed_binding(
        state: &mut MemoryState,
        module: &InvocationModule,
        provider: AccountId,
    ) -> ServiceBinding {
        let binding = ServiceBinding {
            def_name: ORACLE.into(),
            provider,
            deposit: coins("stake", 20_000),
            pricing: coins("stake", 10),
            available: true,
            disabled_at: 0,
        };
        module.set_service_binding(state, &binding).unwrap();
        binding
    }

    pub(crate) fn base_context_params() -> CreateContextParams {
        CreateContextParams {
            service_name: ORACLE.into(),
            providers: vec![provider()],
            input: br#"{"pair":"eth-usd"}"#.to_vec(),
            service_fee_cap: coins("stake", 100),
            timeout: 50,
            repeated: true,
            repeated_frequency: 60,
            repeated_total: BatchTotal::Bounded(10),
            initial_state: ContextState::Paused,
            response_threshold: 1,
            response_handler: "price_feed".into(),
        }
    }

    #[test]
    fn test_params_default_until_genesis() {
        let module = test_module();
        let mut state = MemoryState::new();
        assert_eq!(module.params(&state).unwrap(), Params::default());

        let custom = Params {
            max_request_timeout: 25,
            service_fee_tax_bp: 500,
            min_deposit_multiple: 10,
        };
        module.init_genesis(&mut state, &custom).unwrap();
        assert_eq!(module.params(&state).unwrap(), custom);
        assert_eq!(module.intra_block_counter(&state).unwrap(), 0);
    }

    #[test]
    fn test_dispatch_create_and_pause() {
        let module = test_module();
        let mut state = MemoryState::new();
        let ctx = tx_context(10, consumer());

        let encoded = codec::to_bytes_canonical(&base_context_params()).unwrap();
        let reply = module
            .handle_service_call(&mut state, "create_context@v1", &encoded, &ctx)
            .unwrap();
        let id: ContextId = codec::from_bytes_canonical(&reply).unwrap();
        assert_eq!(id, ContextId::new(10, 0));

        // Paused at creation: pausing again must fail through the dispatcher.
        let encoded =
            codec::to_bytes_canonical(&ContextIdParams { context_id: id }).unwrap();
        let err = module
            .handle_service_call(&mut state, "pause_context@v1", &encoded, &ctx)
            .unwrap_err();
        assert!(matches!(err, ServiceError::ContextNotRunning));
    }

    #[test]
    fn test_dispatch_rejects_unknown_method() {
        let module = test_module();
        let mut state = MemoryState::new();
        let ctx = tx_context(1, consumer());
        let err = module
            .handle_service_call(&mut state, "create_context@v2", &[], &ctx)
            .unwrap_err();
        assert!(matches!(err, ServiceError::UnsupportedMethod(_)));
    }

    #[test]
    fn test_dispatch_rejects_malformed_params() {
        let module = test_module();
        let mut state = MemoryState::new();
        let ctx = tx_context(1, consumer());
        let err = module
            .handle_service_call(&mut state, "create_context@v1", &[0xff], &ctx)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Codec(_)));
    }

    #[test]
    fn test_dispatch_add_response_rejects_malformed_request_id() {
        let module = test_module();
        let mut state = MemoryState::new();
        let ctx = tx_context(1, provider());
        let params = AddResponseParams {
            request_chain_id: ChainId::from("svcnet-test"),
            request_id: "not-hex".into(),
            output: Vec::new(),
            error: Vec::new(),
        };
        let encoded = codec::to_bytes_canonical(&params).unwrap();
        let err = module
            .handle_service_call(&mut state, "add_response@v1", &encoded, &ctx)
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRequestId(_)));
    }
}
