// Path: crates/api/src/lib.rs
//! Core traits and APIs for the svcnet kernel.

#![forbid(unsafe_code)]

/// Key-value state access traits.
pub mod state;
/// Service dispatch, lifecycle hooks and injected collaborator interfaces.
pub mod services;
/// The deterministic execution context handed to every operation.
pub mod transaction;
