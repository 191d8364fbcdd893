// Path: crates/types/src/error/mod.rs
//! Core error types for the svcnet kernel.

use crate::app::AccountId;
use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors related to the state store.
#[derive(Error, Debug)]
pub enum StateError {
    /// The requested key was not found in the state.
    #[error("Key not found in state")]
    KeyNotFound,
    /// An error occurred in the state backend.
    #[error("State backend error: {0}")]
    Backend(String),
    /// The stored value was invalid for the expected type.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    /// An error occurred during state deserialization.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ErrorCode for StateError {
    fn code(&self) -> &'static str {
        match self {
            Self::KeyNotFound => "STATE_KEY_NOT_FOUND",
            Self::Backend(_) => "STATE_BACKEND_ERROR",
            Self::InvalidValue(_) => "STATE_INVALID_VALUE",
            Self::Decode(_) => "STATE_DECODE_ERROR",
        }
    }
}

/// Errors returned by the service invocation module.
///
/// Every validation error is returned before any mutation occurs, so a
/// failed single-entity operation never leaves partial writes behind.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The named service definition is not registered.
    #[error("Service definition '{0}' not found")]
    UnknownServiceDefinition(String),
    /// The request input does not conform to the definition's input schema.
    #[error("Invalid request input: {0}")]
    InvalidRequestInput(String),
    /// The specified request context does not exist.
    #[error("Request context {0} not found")]
    ContextNotFound(String),
    /// The operation applies only to repeated contexts.
    #[error("Request context is not repeated")]
    NonRepeatedContext,
    /// The context must be running for this operation.
    #[error("Request context is not running")]
    ContextNotRunning,
    /// The context must be paused for this operation.
    #[error("Request context is not paused")]
    ContextNotPaused,
    /// The timeout exceeds the module's maximum.
    #[error("Timeout {timeout} must not be greater than {max}")]
    InvalidTimeout {
        /// The requested timeout in blocks.
        timeout: u64,
        /// The configured `max_request_timeout`.
        max: u64,
    },
    /// The repeated frequency is below the context timeout.
    #[error("Repeated frequency {frequency} must not be less than the timeout {timeout}")]
    InvalidFrequency {
        /// The requested frequency in blocks.
        frequency: u64,
        /// The context timeout in blocks.
        timeout: u64,
    },
    /// The new batch total does not exceed the batches already issued.
    #[error("Repeated total {total} must be greater than the current batch counter {batch_counter}")]
    InvalidTotal {
        /// The requested batch total.
        total: u64,
        /// Batches already issued.
        batch_counter: u64,
    },
    /// The provider list is invalid.
    #[error("Invalid providers: {0}")]
    InvalidProviders(String),
    /// The provided request id string is malformed.
    #[error("Invalid request id: {0}")]
    InvalidRequestId(String),
    /// The request is unknown, already settled, or expired.
    #[error("Request {0} not active")]
    RequestNotActive(String),
    /// The responding provider does not match the request's provider.
    #[error("Provider {0} does not match the request provider")]
    MismatchedProvider(AccountId),
    /// The consumer does not hold the profiler role.
    #[error("Account {0} is not a profiler")]
    NotProfiler(AccountId),
    /// The account does not hold the trustee role.
    #[error("Account {0} is not a trustee")]
    NotTrustee(AccountId),
    /// No fee accrual record exists for the address.
    #[error("No fee record for address {0}")]
    FeeNotFound(AccountId),
    /// No binding exists for the definition/provider pair.
    #[error("Service binding for '{def_name}' and provider {provider} not found")]
    BindingNotFound {
        /// The service definition name.
        def_name: String,
        /// The provider address.
        provider: AccountId,
    },
    /// The binding exists but is disabled.
    #[error("Service binding is unavailable")]
    BindingUnavailable,
    /// An account transfer or fee computation underflowed.
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    /// The service does not expose the requested method.
    #[error("Unsupported service method: {0}")]
    UnsupportedMethod(String),
    /// Canonical encoding or decoding of call parameters failed.
    #[error("Codec error: {0}")]
    Codec(String),
    /// An error occurred while accessing the state store.
    #[error("State error: {0}")]
    State(#[from] StateError),
}

impl ErrorCode for ServiceError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownServiceDefinition(_) => "SVC_UNKNOWN_DEFINITION",
            Self::InvalidRequestInput(_) => "SVC_INVALID_REQUEST_INPUT",
            Self::ContextNotFound(_) => "SVC_CONTEXT_NOT_FOUND",
            Self::NonRepeatedContext => "SVC_CONTEXT_NON_REPEATED",
            Self::ContextNotRunning => "SVC_CONTEXT_NOT_RUNNING",
            Self::ContextNotPaused => "SVC_CONTEXT_NOT_PAUSED",
            Self::InvalidTimeout { .. } => "SVC_INVALID_TIMEOUT",
            Self::InvalidFrequency { .. } => "SVC_INVALID_FREQUENCY",
            Self::InvalidTotal { .. } => "SVC_INVALID_TOTAL",
            Self::InvalidProviders(_) => "SVC_INVALID_PROVIDERS",
            Self::InvalidRequestId(_) => "SVC_INVALID_REQUEST_ID",
            Self::RequestNotActive(_) => "SVC_REQUEST_NOT_ACTIVE",
            Self::MismatchedProvider(_) => "SVC_MISMATCHED_PROVIDER",
            Self::NotProfiler(_) => "SVC_NOT_PROFILER",
            Self::NotTrustee(_) => "SVC_NOT_TRUSTEE",
            Self::FeeNotFound(_) => "SVC_FEE_NOT_FOUND",
            Self::BindingNotFound { .. } => "SVC_BINDING_NOT_FOUND",
            Self::BindingUnavailable => "SVC_BINDING_UNAVAILABLE",
            Self::InsufficientFunds(_) => "SVC_INSUFFICIENT_FUNDS",
            Self::UnsupportedMethod(_) => "SVC_UNSUPPORTED_METHOD",
            Self::Codec(_) => "SVC_CODEC_ERROR",
            Self::State(_) => "SVC_STATE_ERROR",
        }
    }
}

impl From<String> for ServiceError {
    fn from(s: String) -> Self {
        ServiceError::Codec(s)
    }
}
