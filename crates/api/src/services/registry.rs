// Path: crates/api/src/services/registry.rs
//! Capability interfaces for the external service-definition and role
//! registries. The invocation module consumes these through dependency
//! injection so tests can substitute fakes.

use crate::state::StateAccess;
use svcnet_types::app::{AccountId, ServiceDefinition};
use svcnet_types::error::{ServiceError, StateError};

/// Lookup and input validation against registered service definitions.
pub trait ServiceDefinitionRegistry: Send + Sync {
    /// Returns the definition registered under `name`, if any.
    fn definition(
        &self,
        state: &dyn StateAccess,
        name: &str,
    ) -> Result<Option<ServiceDefinition>, StateError>;

    /// Checks `input` against the definition's declared input schema.
    fn validate_input(
        &self,
        definition: &ServiceDefinition,
        input: &[u8],
    ) -> Result<(), ServiceError>;
}

/// Role membership checks for the profiler and trustee roles.
pub trait RoleRegistry: Send + Sync {
    /// True if `account` holds the profiler role.
    fn is_profiler(
        &self,
        state: &dyn StateAccess,
        account: &AccountId,
    ) -> Result<bool, StateError>;

    /// True if `account` holds the trustee role.
    fn is_trustee(&self, state: &dyn StateAccess, account: &AccountId)
        -> Result<bool, StateError>;
}
