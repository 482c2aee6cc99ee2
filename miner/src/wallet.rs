//! The wallet seam: where the standard-mode coinbase payout script comes
//! from when no `-mineraddress` is configured.

use crate::config::MinerOptions;
use crate::error::Error;
use keys::Type as AddressType;
use script::{Builder, Script};

/// A key reserved out of the wallet's pool for one worker. The key is
/// returned to the pool unless `keep` marks it used after a block was
/// accepted.
pub trait ReserveScript: Send {
	/// Script to pay the subsidy to. Fails when the key pool is empty.
	fn script_pubkey(&mut self) -> Result<Script, Error>;

	/// Commits the reserved key permanently.
	fn keep(&mut self);
}

/// Hands out independent reserve keys, one per worker.
pub trait Wallet: Send + Sync {
	fn reserve_script(&self) -> Box<dyn ReserveScript>;
}

/// The fallback when the node runs without a wallet: every request reports
/// an exhausted key pool.
pub struct NoKeys;

impl ReserveScript for NoKeys {
	fn script_pubkey(&mut self) -> Result<Script, Error> {
		Err(Error::KeypoolExhausted)
	}

	fn keep(&mut self) {}
}

/// Resolves the miner payout script: the configured address wins, the
/// wallet's reserve key is the fallback.
pub fn miner_script(options: &MinerOptions, reserve: &mut dyn ReserveScript) -> Result<Script, Error> {
	match &options.miner_address {
		Some(address) => Ok(match address.kind {
			AddressType::P2PKH => Builder::build_p2pkh(&address.hash),
			AddressType::P2SH => Builder::build_p2sh(&address.hash),
		}),
		None => reserve.script_pubkey(),
	}
}
