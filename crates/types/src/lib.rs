// Path: crates/types/src/lib.rs
//! Core data structures and error types for the svcnet kernel.

#![forbid(unsafe_code)]

/// Application-level data structures: accounts, coins, request contexts,
/// requests, responses, bindings and fee accruals.
pub mod app;
/// The canonical, deterministic binary codec for consensus-critical state.
pub mod codec;
/// Error taxonomy for state access and service operations.
pub mod error;
/// Well-known state keys and key-builder functions.
pub mod keys;
