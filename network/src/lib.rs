#[macro_use]
extern crate lazy_static;

extern crate chain;
extern crate onyxcrypto;
extern crate primitives;

mod consensus;
mod network;

pub use primitives::{compact, hash};

pub use crate::consensus::{ConsensusParams, FORK_BLOCK_SENTINEL, PROCESS_ID_HASH};
pub use crate::network::{Magic, Network};
