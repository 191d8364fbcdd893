// Path: crates/api/src/transaction/mod.rs
//! Transaction execution support types.

mod context;

pub use context::TxContext;
