// Path: crates/services/src/invocation/counter.rs
//! The per-block request operation counter.
//!
//! The counter disambiguates identifiers allocated within one execution
//! slot. It is persisted so it survives across operations in the slot; the
//! surrounding execution environment resets it at slot boundaries, this
//! component only exposes get and set.

use crate::invocation::InvocationModule;
use svcnet_api::state::StateAccess;
use svcnet_types::codec;
use svcnet_types::error::ServiceError;
use svcnet_types::keys::INTRA_BLOCK_COUNTER_KEY;

impl InvocationModule {
    /// The current in-block request operation counter, zero if unset.
    pub fn intra_block_counter(&self, state: &dyn StateAccess) -> Result<i16, ServiceError> {
        match state.get(INTRA_BLOCK_COUNTER_KEY)? {
            Some(bytes) => codec::from_bytes_canonical(&bytes).map_err(ServiceError::Codec),
            None => Ok(0),
        }
    }

    /// Persists the in-block request operation counter.
    pub fn set_intra_block_counter(
        &self,
        state: &mut dyn StateAccess,
        counter: i16,
    ) -> Result<(), ServiceError> {
        let bytes = codec::to_bytes_canonical(&counter).map_err(ServiceError::Codec)?;
        state.insert(INTRA_BLOCK_COUNTER_KEY, &bytes)?;
        Ok(())
    }

    /// Allocates the next counter value: returns the current value and
    /// persists its successor.
    pub(crate) fn next_intra_block_counter(
        &self,
        state: &mut dyn StateAccess,
    ) -> Result<i16, ServiceError> {
        let counter = self.intra_block_counter(&*state)?;
        self.set_intra_block_counter(state, counter.wrapping_add(1))?;
        Ok(counter)
    }
}

#[cfg(test)]
mod tests {
    use crate::invocation::tests::test_module;
    use svcnet_test_utils::MemoryState;

    #[test]
    fn test_counter_defaults_to_zero_and_persists() {
        let module = test_module();
        let mut state = MemoryState::new();

        assert_eq!(module.intra_block_counter(&state).unwrap(), 0);

        assert_eq!(module.next_intra_block_counter(&mut state).unwrap(), 0);
        assert_eq!(module.next_intra_block_counter(&mut state).unwrap(), 1);
        assert_eq!(module.intra_block_counter(&state).unwrap(), 2);

        module.set_intra_block_counter(&mut state, 0).unwrap();
        assert_eq!(module.intra_block_counter(&state).unwrap(), 0);
    }
}
