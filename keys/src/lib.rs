//! Address handling for the miner's payout destination.

extern crate base58;
#[macro_use]
extern crate derive_more;
extern crate onyxcrypto;
extern crate primitives;

mod address;
mod display;
mod error;
mod network;

pub use primitives::{bytes, hash};

pub use crate::address::{Address, Type};
pub use crate::display::DisplayLayout;
pub use crate::error::Error;
pub use crate::network::Network;

use onyxcrypto::HASH160;

/// 20 bytes long hash derived from public `ripemd160(sha256(public))`
pub type AddressHash = HASH160;
