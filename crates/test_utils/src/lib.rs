// Path: crates/test_utils/src/lib.rs
//! Shared test fixtures: an in-memory state store, a state-backed bank and
//! static registries standing in for the external collaborators.

#![forbid(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use svcnet_api::services::bank::BankKeeper;
use svcnet_api::services::registry::{RoleRegistry, ServiceDefinitionRegistry};
use svcnet_api::state::{StateAccess, StateScanIter};
use svcnet_api::transaction::TxContext;
use svcnet_types::app::{AccountId, ChainId, Coins, ServiceDefinition};
use svcnet_types::codec;
use svcnet_types::error::{ServiceError, StateError};

/// An ordered in-memory `StateAccess` implementation. The `BTreeMap` gives
/// prefix scans the ascending key order the indices rely on.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryState {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of stored entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl StateAccess for MemoryState {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.data.get(key).cloned())
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.data.remove(key);
        Ok(())
    }

    fn batch_apply(
        &mut self,
        inserts: &[(Vec<u8>, Vec<u8>)],
        deletes: &[Vec<u8>],
    ) -> Result<(), StateError> {
        for key in deletes {
            self.delete(key)?;
        }
        for (key, value) in inserts {
            self.insert(key, value)?;
        }
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        let results: Vec<_> = self
            .data
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| Ok((Arc::from(k.as_slice()), Arc::from(v.as_slice()))))
            .collect();
        Ok(Box::new(results.into_iter()))
    }
}

const BALANCE_PREFIX: &[u8] = b"account::balance::";

/// A bank that keeps balances directly in the state store, sufficient to
/// exercise every escrow, tax and refund path.
#[derive(Debug, Clone, Default)]
pub struct StateBank;

impl StateBank {
    fn balance_key(account: &AccountId) -> Vec<u8> {
        [BALANCE_PREFIX, account.as_ref()].concat()
    }

    /// Reads an account balance, empty if the account is unknown.
    pub fn balance(state: &dyn StateAccess, account: &AccountId) -> Coins {
        state
            .get(&Self::balance_key(account))
            .ok()
            .flatten()
            .and_then(|b| codec::from_bytes_canonical(&b).ok())
            .unwrap_or_else(Coins::empty)
    }

    /// Overwrites an account balance.
    pub fn set_balance(state: &mut dyn StateAccess, account: &AccountId, coins: &Coins) {
        let bytes = codec::to_bytes_canonical(coins).expect("coins encode");
        state
            .insert(&Self::balance_key(account), &bytes)
            .expect("balance write");
    }

    fn debit(
        &self,
        state: &mut dyn StateAccess,
        from: &AccountId,
        amount: &Coins,
    ) -> Result<(), ServiceError> {
        let balance = Self::balance(state, from);
        let remaining = balance.safe_sub(amount).ok_or_else(|| {
            ServiceError::InsufficientFunds(format!(
                "account {} holds {}, needs {}",
                from, balance, amount
            ))
        })?;
        Self::set_balance(state, from, &remaining);
        Ok(())
    }
}

impl BankKeeper for StateBank {
    fn send_coins(
        &self,
        state: &mut dyn StateAccess,
        from: &AccountId,
        to: &AccountId,
        amount: &Coins,
    ) -> Result<(), ServiceError> {
        if amount.is_empty() {
            return Ok(());
        }
        self.debit(state, from, amount)?;
        let credited = Self::balance(state, to).add(amount);
        Self::set_balance(state, to, &credited);
        Ok(())
    }

    fn burn_coins(
        &self,
        state: &mut dyn StateAccess,
        from: &AccountId,
        amount: &Coins,
    ) -> Result<(), ServiceError> {
        if amount.is_empty() {
            return Ok(());
        }
        self.debit(state, from, amount)
    }
}

/// A fixed set of service definitions. Input validation accepts any input
/// for schema-less definitions and requires well-formed JSON otherwise.
#[derive(Debug, Clone, Default)]
pub struct StaticServiceRegistry {
    definitions: BTreeMap<String, ServiceDefinition>,
}

impl StaticServiceRegistry {
    /// Builds a registry over the given definitions.
    pub fn new(definitions: Vec<ServiceDefinition>) -> Self {
        Self {
            definitions: definitions
                .into_iter()
                .map(|d| (d.name.clone(), d))
                .collect(),
        }
    }
}

impl ServiceDefinitionRegistry for StaticServiceRegistry {
    fn definition(
        &self,
        _state: &dyn StateAccess,
        name: &str,
    ) -> Result<Option<ServiceDefinition>, StateError> {
        Ok(self.definitions.get(name).cloned())
    }

    fn validate_input(
        &self,
        definition: &ServiceDefinition,
        input: &[u8],
    ) -> Result<(), ServiceError> {
        if definition.schemas.is_empty() {
            return Ok(());
        }
        serde_json::from_slice::<serde_json::Value>(input)
            .map(|_| ())
            .map_err(|e| ServiceError::InvalidRequestInput(e.to_string()))
    }
}

/// Fixed profiler/trustee role sets.
#[derive(Debug, Clone, Default)]
pub struct StaticRoleRegistry {
    /// Accounts holding the profiler role.
    pub profilers: BTreeSet<AccountId>,
    /// Accounts holding the trustee role.
    pub trustees: BTreeSet<AccountId>,
}

impl RoleRegistry for StaticRoleRegistry {
    fn is_profiler(
        &self,
        _state: &dyn StateAccess,
        account: &AccountId,
    ) -> Result<bool, StateError> {
        Ok(self.profilers.contains(account))
    }

    fn is_trustee(
        &self,
        _state: &dyn StateAccess,
        account: &AccountId,
    ) -> Result<bool, StateError> {
        Ok(self.trustees.contains(account))
    }
}

/// A deterministic account id built from a single tag byte.
pub fn account(tag: u8) -> AccountId {
    AccountId([tag; 32])
}

/// A one-denomination coin set.
pub fn coins(denom: &str, amount: u128) -> Coins {
    Coins::one(denom, amount)
}

/// A transaction context at `height` signed by `signer`, with a timestamp
/// derived deterministically from the height.
pub fn tx_context(height: u64, signer: AccountId) -> TxContext {
    TxContext {
        block_height: height,
        block_timestamp: height * 5,
        chain_id: ChainId::from("svcnet-test"),
        signer_account_id: signer,
    }
}
