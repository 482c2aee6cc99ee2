//! Shared fixtures: an in-memory chain, transaction builders and
//! deterministic clocks.

extern crate chain;
extern crate network;
extern crate onyxcrypto;
extern crate primitives;
extern crate storage;

mod chain_builder;
mod memory_chain;
pub mod time;

pub use crate::chain_builder::TransactionBuilder;
pub use crate::memory_chain::MemoryChain;
