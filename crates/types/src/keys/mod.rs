// Path: crates/types/src/keys/mod.rs
//! Defines constants and builders for well-known state keys.
//!
//! These provide a single source of truth for the keys used to store the
//! invocation module's data in the state store. Fixed-width big-endian id
//! segments keep prefix scans ordered: the expiration index in particular
//! relies on `RequestId::to_bytes` sorting by `(expiration, request_height,
//! counter)`.

use crate::app::{AccountId, ChainId, ContextId, RequestId};

/// The state key for the module parameters.
pub const PARAMS_KEY: &[u8] = b"service::params";
/// The state key for the per-block request operation counter.
pub const INTRA_BLOCK_COUNTER_KEY: &[u8] = b"service::intra_block_counter";

/// The state key prefix for request context records.
pub const CONTEXT_RECORD_PREFIX: &[u8] = b"context::record::";
/// The state key prefix for pending new-batch triggers, keyed by height.
pub const CONTEXT_TRIGGER_PREFIX: &[u8] = b"context::trigger::";
/// The state key prefix for the context -> pending trigger back-pointer.
pub const CONTEXT_TRIGGER_OF_PREFIX: &[u8] = b"context::trigger_of::";

/// The state key prefix for primary request records.
pub const REQUEST_RECORD_PREFIX: &[u8] = b"request::record::";
/// The state key prefix for the active-by-provider index.
pub const ACTIVE_BY_PROVIDER_PREFIX: &[u8] = b"request::active::provider::";
/// The state key prefix for the active-by-expiration index.
pub const ACTIVE_BY_EXPIRATION_PREFIX: &[u8] = b"request::active::expiring::";
/// The state key prefix for response records.
pub const RESPONSE_PREFIX: &[u8] = b"response::";

/// The state key prefix for service bindings.
pub const BINDING_PREFIX: &[u8] = b"binding::";
/// The state key prefix for provider incoming-fee accruals.
pub const INCOMING_FEE_PREFIX: &[u8] = b"fee::incoming::";
/// The state key prefix for consumer returned-fee accruals.
pub const RETURNED_FEE_PREFIX: &[u8] = b"fee::returned::";

/// The key of a request context record.
pub fn context_record_key(id: &ContextId) -> Vec<u8> {
    [CONTEXT_RECORD_PREFIX, &id.to_bytes()].concat()
}

/// The key of a pending new-batch trigger.
pub fn context_trigger_key(trigger_height: u64, id: &ContextId) -> Vec<u8> {
    [
        CONTEXT_TRIGGER_PREFIX,
        trigger_height.to_be_bytes().as_slice(),
        &id.to_bytes(),
    ]
    .concat()
}

/// The prefix matching every trigger due at `trigger_height`.
pub fn context_trigger_prefix(trigger_height: u64) -> Vec<u8> {
    [CONTEXT_TRIGGER_PREFIX, trigger_height.to_be_bytes().as_slice()].concat()
}

/// The key of the pending-trigger back-pointer of a context.
pub fn context_trigger_of_key(id: &ContextId) -> Vec<u8> {
    [CONTEXT_TRIGGER_OF_PREFIX, &id.to_bytes()].concat()
}

/// The key of a primary request record.
pub fn request_record_key(id: &RequestId) -> Vec<u8> {
    [REQUEST_RECORD_PREFIX, &id.to_bytes()].concat()
}

/// The key of an active-by-provider index entry.
pub fn active_by_provider_key(provider: &AccountId, id: &RequestId) -> Vec<u8> {
    [
        ACTIVE_BY_PROVIDER_PREFIX,
        provider.as_ref(),
        b"::",
        &id.to_bytes(),
    ]
    .concat()
}

/// The prefix matching every active request of one provider.
pub fn active_by_provider_prefix(provider: &AccountId) -> Vec<u8> {
    [ACTIVE_BY_PROVIDER_PREFIX, provider.as_ref(), b"::"].concat()
}

/// The key of an active-by-expiration index entry.
pub fn active_by_expiration_key(id: &RequestId) -> Vec<u8> {
    [ACTIVE_BY_EXPIRATION_PREFIX, &id.to_bytes()].concat()
}

/// The prefix matching every active request expiring at `height`.
pub fn active_by_expiration_prefix(height: u64) -> Vec<u8> {
    [ACTIVE_BY_EXPIRATION_PREFIX, height.to_be_bytes().as_slice()].concat()
}

/// The key of a response record.
pub fn response_key(request_chain_id: &ChainId, id: &RequestId) -> Vec<u8> {
    [
        RESPONSE_PREFIX,
        request_chain_id.as_str().as_bytes(),
        b"::",
        &id.to_bytes(),
    ]
    .concat()
}

/// The key of a service binding.
pub fn binding_key(def_name: &str, provider: &AccountId) -> Vec<u8> {
    [BINDING_PREFIX, def_name.as_bytes(), b"::", provider.as_ref()].concat()
}

/// The key of a provider's incoming-fee accrual.
pub fn incoming_fee_key(address: &AccountId) -> Vec<u8> {
    [INCOMING_FEE_PREFIX, address.as_ref()].concat()
}

/// The key of a consumer's returned-fee accrual.
pub fn returned_fee_key(address: &AccountId) -> Vec<u8> {
    [RETURNED_FEE_PREFIX, address.as_ref()].concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiration_keys_scan_in_fifo_order() {
        let ids = [
            RequestId::new(100, 98, 0),
            RequestId::new(100, 99, 0),
            RequestId::new(100, 99, 1),
            RequestId::new(101, 1, 0),
        ];
        let keys: Vec<Vec<u8>> = ids.iter().map(active_by_expiration_key).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);

        // All height-100 entries share the height prefix, height 101 does not.
        let prefix = active_by_expiration_prefix(100);
        assert!(keys[..3].iter().all(|k| k.starts_with(&prefix)));
        assert!(!keys[3].starts_with(&prefix));
    }

    #[test]
    fn test_trigger_prefix_matches_only_its_height() {
        let id = ContextId::new(5, 0);
        let key = context_trigger_key(70, &id);
        assert!(key.starts_with(&context_trigger_prefix(70)));
        assert!(!key.starts_with(&context_trigger_prefix(71)));
    }
}
