//! Block-template assembly and the mining loop.
//!
//! Two ways to fill a block body: standard mode selects pending
//! transactions by priority and fee, fork mode replays balances inherited
//! from the parent chain out of per-height UTXO snapshot files. Either way
//! the template ends up in front of an Equihash solver and, with luck, in
//! front of the node's block-processing entry.

#[macro_use]
extern crate derive_more;
#[macro_use]
extern crate log;

extern crate chain;
extern crate keys;
extern crate network;
extern crate num_cpus;
extern crate onyxcrypto;
extern crate parking_lot;
extern crate primitives;
extern crate rand;
extern crate script;
extern crate serialization as ser;
extern crate storage;

mod block_assembler;
mod block_template;
mod config;
mod error;
mod fee;
mod fork_assembler;
mod fork_coinbase;
mod memory_pool;
mod miner;
mod snapshot;
mod solver;
mod tip_notifier;
mod wallet;
mod worker;

pub use primitives::{bytes, compact, hash};

pub use crate::block_assembler::{allow_free, last_block_info, legacy_sigops, random_nonce, update_time, BlockAssembler};
pub use crate::block_template::BlockTemplate;
pub use crate::config::MinerOptions;
pub use crate::error::Error;
pub use crate::fee::FeeRate;
pub use crate::fork_assembler::ForkBlockAssembler;
pub use crate::fork_coinbase::{dummy_fork_coinbase, fork_coinbase};
pub use crate::memory_pool::{Information as MemoryPoolInformation, MemoryPool, MemoryPoolEntry};
pub use crate::miner::{MemoryPoolRef, Miner, MinerContext, NetworkState};
pub use crate::snapshot::{shielded_utxo_file_name, utxo_file_name, SnapshotReader, SnapshotRecord};
pub use crate::solver::{create_solver, EquihashSolver, SolverKind};
pub use crate::tip_notifier::{TipConnection, TipNotifier};
pub use crate::wallet::{miner_script, ReserveScript, Wallet};
pub use crate::worker::ExtraNonce;
