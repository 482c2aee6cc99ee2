extern crate parking_lot;

extern crate chain;
#[macro_use]
extern crate derive_more;
extern crate onyxcrypto;
extern crate primitives;

mod block_index;
mod chain_api;
mod coins;
mod error;

pub use primitives::{bytes, hash};

pub use crate::block_index::BlockIndex;
pub use crate::chain_api::{ChainApi, ChainRef};
pub use crate::coins::{Coin, CoinsView, CoinsViewCache};
pub use crate::error::Error;
