// Path: crates/types/src/app/invocation.rs
//! Data structures for the service invocation module: request contexts,
//! individual requests and responses, provider bindings and fee accruals.

use crate::app::{AccountId, ChainId, Coins};
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Module parameters, persisted in state and read fresh on every call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Params {
    /// The maximum number of blocks a request may remain outstanding.
    pub max_request_timeout: u64,
    /// The fraction of provider earnings deducted as tax, in basis points
    /// (`0..10_000`). Integer basis points keep the tax arithmetic
    /// deterministic across replicas.
    pub service_fee_tax_bp: u16,
    /// A binding's minimum required deposit is its pricing multiplied by
    /// this factor.
    pub min_deposit_multiple: u64,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            max_request_timeout: 100,
            service_fee_tax_bp: 1_000,
            min_deposit_multiple: 1_000,
        }
    }
}

/// The lifecycle state of a recurring request context.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum ContextState {
    /// Batches are scheduled and issued.
    Running,
    /// Batch issuance is suspended.
    Paused,
}

/// The batch cap of a repeated context.
///
/// Replaces the legacy signed convention where a non-positive total meant
/// "unbounded"; the sentinel is now an explicit variant.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum BatchTotal {
    /// No cap on the number of batches.
    Unbounded,
    /// A hard cap on the number of batches issued over the context lifetime.
    Bounded(u64),
}

impl BatchTotal {
    /// True once `batch_counter` batches exhaust this cap.
    pub fn reached(&self, batch_counter: u64) -> bool {
        match self {
            BatchTotal::Unbounded => false,
            BatchTotal::Bounded(n) => batch_counter >= *n,
        }
    }
}

/// The identity of a request context: `(creation_height, intra-block counter)`
/// encoded big-endian so equal-height ids sort by allocation order.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode,
)]
pub struct ContextId {
    /// The block height at which the context was created.
    pub creation_height: u64,
    /// The intra-block counter value allocated at creation.
    pub counter: i16,
}

impl ContextId {
    /// Creates a context id from its components.
    pub fn new(creation_height: u64, counter: i16) -> Self {
        ContextId {
            creation_height,
            counter,
        }
    }

    /// The fixed-width, lexicographically ordered byte form used in state keys.
    pub fn to_bytes(&self) -> [u8; 10] {
        let mut out = [0u8; 10];
        out[..8].copy_from_slice(&self.creation_height.to_be_bytes());
        out[8..].copy_from_slice(&self.counter.to_be_bytes());
        out
    }

    /// Parses the fixed-width byte form.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 10 {
            return None;
        }
        let creation_height = u64::from_be_bytes(bytes[..8].try_into().ok()?);
        let counter = i16::from_be_bytes(bytes[8..].try_into().ok()?);
        Some(ContextId {
            creation_height,
            counter,
        })
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}

impl FromStr for ContextId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| e.to_string())?;
        ContextId::from_bytes(&bytes).ok_or_else(|| "invalid context id length".to_string())
    }
}

/// The identity of an individual request:
/// `(expiration_height, request_height, intra-block counter)`.
///
/// The big-endian byte form is load-bearing: its lexicographic order equals
/// ascending `(expiration, request_height, counter)` order, which is what
/// makes the expiration index a FIFO deadline queue.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode,
)]
pub struct RequestId {
    /// The height at which the request expires.
    pub expiration_height: u64,
    /// The height at which the request was created.
    pub request_height: u64,
    /// The intra-block counter value allocated at creation.
    pub counter: i16,
}

impl RequestId {
    /// Creates a request id from its components.
    pub fn new(expiration_height: u64, request_height: u64, counter: i16) -> Self {
        RequestId {
            expiration_height,
            request_height,
            counter,
        }
    }

    /// The fixed-width, lexicographically ordered byte form used in state keys.
    pub fn to_bytes(&self) -> [u8; 18] {
        let mut out = [0u8; 18];
        out[..8].copy_from_slice(&self.expiration_height.to_be_bytes());
        out[8..16].copy_from_slice(&self.request_height.to_be_bytes());
        out[16..].copy_from_slice(&self.counter.to_be_bytes());
        out
    }

    /// Parses the fixed-width byte form.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 18 {
            return None;
        }
        let expiration_height = u64::from_be_bytes(bytes[..8].try_into().ok()?);
        let request_height = u64::from_be_bytes(bytes[8..16].try_into().ok()?);
        let counter = i16::from_be_bytes(bytes[16..].try_into().ok()?);
        Some(RequestId {
            expiration_height,
            request_height,
            counter,
        })
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}

impl FromStr for RequestId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| e.to_string())?;
        RequestId::from_bytes(&bytes).ok_or_else(|| "invalid request id length".to_string())
    }
}

/// A (possibly recurring) campaign of service calls against a set of
/// candidate providers. Never physically deleted: termination is modeled as
/// "paused with its batch total exhausted".
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct RequestContext {
    /// The target service definition name.
    pub service_name: String,
    /// Ordered candidate providers for each batch.
    pub providers: Vec<AccountId>,
    /// The consumer paying for each batch.
    pub consumer: AccountId,
    /// Serialized call input, validated against the definition's schema.
    pub input: Vec<u8>,
    /// The fee escrowed per provider per batch.
    pub service_fee_cap: Coins,
    /// Blocks an individual request remains outstanding.
    pub timeout: u64,
    /// Whether this context issues batches repeatedly.
    pub repeated: bool,
    /// Blocks between batches; zero when not repeated.
    pub repeated_frequency: u64,
    /// Cap on the number of batches; `Bounded(0)` when not repeated.
    pub repeated_total: BatchTotal,
    /// Batches issued so far.
    pub batch_counter: u64,
    /// The lifecycle state.
    pub state: ContextState,
    /// Minimum responses needed per batch before the handler fires.
    pub response_threshold: u16,
    /// The name of the module callback handling batch responses.
    pub response_handler: String,
}

impl RequestContext {
    /// True once no further batch may be issued: a repeated context whose
    /// total is reached, or a single-shot context that already fired.
    pub fn batches_exhausted(&self) -> bool {
        if self.repeated {
            self.repeated_total.reached(self.batch_counter)
        } else {
            self.batch_counter > 0
        }
    }
}

/// An individual outstanding service call. Owned by the request/response
/// engine; lives in a primary record plus two active index views keyed for
/// provider-scoped and deadline-scoped lookup.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct SvcRequest {
    /// The chain hosting the service definition.
    pub def_chain_id: ChainId,
    /// The service definition name.
    pub def_name: String,
    /// The chain hosting the provider's binding.
    pub bind_chain_id: ChainId,
    /// The chain the request originates from.
    pub request_chain_id: ChainId,
    /// The consumer whose fee is escrowed.
    pub consumer: AccountId,
    /// The provider expected to answer.
    pub provider: AccountId,
    /// The method selector within the service definition.
    pub method_id: i16,
    /// Serialized call input.
    pub input: Vec<u8>,
    /// The escrowed fee.
    pub service_fee: Coins,
    /// Whether the request runs under the profiling role exemption.
    pub profiling: bool,
    /// The height at which the request was created.
    pub request_height: u64,
    /// The height at which the request expires unanswered.
    pub expiration_height: u64,
    /// The intra-block counter value allocated at creation.
    pub counter: i16,
}

impl SvcRequest {
    /// The composite identity of this request.
    pub fn request_id(&self) -> RequestId {
        RequestId::new(self.expiration_height, self.request_height, self.counter)
    }
}

/// The provider's answer to a request. Created exactly once per request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct SvcResponse {
    /// The chain the originating request came from.
    pub request_chain_id: ChainId,
    /// The identity of the originating request.
    pub request_id: RequestId,
    /// The responding provider.
    pub provider: AccountId,
    /// The consumer that issued the request.
    pub consumer: AccountId,
    /// Serialized output payload.
    pub output: Vec<u8>,
    /// Serialized error payload, empty on success.
    pub error: Vec<u8>,
}

/// A provider's advertised willingness to serve a definition, collateralized
/// by a deposit.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ServiceBinding {
    /// The bound service definition name.
    pub def_name: String,
    /// The bound provider.
    pub provider: AccountId,
    /// Posted collateral, reduced by slashing.
    pub deposit: Coins,
    /// The per-request price advertised by the provider.
    pub pricing: Coins,
    /// Whether the binding currently accepts requests.
    pub available: bool,
    /// The block timestamp at which the binding was disabled, zero if never.
    pub disabled_at: u64,
}

impl ServiceBinding {
    /// The minimum deposit required to stay available: pricing scaled by the
    /// module's deposit multiple.
    pub fn min_deposit(&self, min_deposit_multiple: u64) -> Coins {
        self.pricing.scale(min_deposit_multiple as u128)
    }
}

/// Post-tax provider earnings pending withdrawal. Created on first accrual,
/// deleted on payout.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct IncomingFee {
    /// The provider owed these earnings.
    pub address: AccountId,
    /// The accrued amount.
    pub coins: Coins,
}

/// Consumer refunds pending payout. Created on first accrual, deleted on
/// refund.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ReturnedFee {
    /// The consumer owed this refund.
    pub address: AccountId,
    /// The accrued amount.
    pub coins: Coins,
}

/// A registered service definition, owned by the external registry. The
/// invocation module only consumes its existence and input-schema checks.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ServiceDefinition {
    /// The unique definition name.
    pub name: String,
    /// The declared input schema; empty means any input is accepted.
    pub schemas: String,
}
