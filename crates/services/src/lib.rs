// Path: crates/services/src/lib.rs
#![forbid(unsafe_code)]
//! Service module implementations for the svcnet kernel.

pub mod invocation;
