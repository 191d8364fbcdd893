// Path: crates/api/src/state/mod.rs
//! Core traits for state access.
//!
//! The invocation module runs inside a deterministic, replicated state
//! machine; all of its persistence goes through `StateAccess`, a dyn-safe
//! key-value interface with ordered prefix scans. The concrete store is
//! supplied by the surrounding execution environment.

use std::sync::Arc;
use svcnet_types::error::StateError;

// --- Type aliases for common state patterns ---
/// An atomically reference-counted, owned key slice.
pub type StateKey = Arc<[u8]>;
/// An atomically reference-counted, owned value slice.
pub type StateVal = Arc<[u8]>;
/// An owned key-value pair from the state, using cheap-to-clone Arcs.
pub type StateKVPair = (StateKey, StateVal);
/// A streaming iterator over key-value pairs from the state. `Send`-safe so
/// it can cross task boundaries; `Sync` is omitted as iterators are stateful.
pub type StateScanIter<'a> = Box<dyn Iterator<Item = Result<StateKVPair, StateError>> + Send + 'a>;

mod accessor;

pub use accessor::*;
