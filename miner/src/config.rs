use crate::fee::FeeRate;
use crate::solver::SolverKind;
use chain::constants::MAX_BLOCK_SIZE;
use keys::Address;
use std::cmp::{max, min};
use std::path::PathBuf;

/// Default for `-blockmaxsize`.
pub const DEFAULT_BLOCK_MAX_SIZE: usize = 750_000;
/// Default for `-blockprioritysize`.
pub const DEFAULT_BLOCK_PRIORITY_SIZE: usize = 50_000;
/// Default for `-blockminsize`.
pub const DEFAULT_BLOCK_MIN_SIZE: usize = 0;
/// Default for `-forkcbperblock`.
pub const DEFAULT_FORK_COINBASES_PER_BLOCK: u64 = 10_000;
/// Default minimum relay fee rate, satoshis per kilobyte.
pub const DEFAULT_MIN_RELAY_FEE: i64 = 1_000;

/// The miner's configuration surface. Raw user-supplied values go through
/// `clamped` before anything reads them.
#[derive(Debug, Clone)]
pub struct MinerOptions {
	/// Largest block body the standard builder will produce.
	pub block_max_size: usize,
	/// Bytes of the block reserved for high-priority transactions,
	/// included regardless of the fees they pay.
	pub block_priority_size: usize,
	/// Body size below which free transactions are still included.
	pub block_min_size: usize,
	/// Block version override, honored on regtest only.
	pub block_version: Option<u32>,
	/// Destination for the standard-mode subsidy. Falls back to the
	/// wallet's reserve keys when unset.
	pub miner_address: Option<Address>,
	/// Which Equihash solver to drive.
	pub solver: SolverKind,
	/// Log per-transaction priority and fee during selection.
	pub print_priority: bool,
	/// Permit mining before initial block download completes.
	pub fork_mine: bool,
	/// Hard cap on synthetic coinbases per fork block.
	pub fork_coinbases_per_block: u64,
	/// The single height whose snapshot uses the shielded format.
	pub shielded_start_block: Option<u32>,
	/// Directory holding the per-height UTXO snapshot files.
	pub snapshot_dir: PathBuf,
	/// Transactions below this rate are "free" for selection purposes.
	pub min_relay_fee: FeeRate,
}

impl Default for MinerOptions {
	fn default() -> Self {
		MinerOptions {
			block_max_size: DEFAULT_BLOCK_MAX_SIZE,
			block_priority_size: DEFAULT_BLOCK_PRIORITY_SIZE,
			block_min_size: DEFAULT_BLOCK_MIN_SIZE,
			block_version: None,
			miner_address: None,
			solver: SolverKind::Default,
			print_priority: false,
			fork_mine: false,
			fork_coinbases_per_block: DEFAULT_FORK_COINBASES_PER_BLOCK,
			shielded_start_block: None,
			snapshot_dir: PathBuf::from("utxo"),
			min_relay_fee: FeeRate::per_kilobyte(DEFAULT_MIN_RELAY_FEE),
		}
	}
}

impl MinerOptions {
	/// Applies the documented sanity clamps:
	/// `block_max_size` to `[1000, MAX_BLOCK_SIZE - 1000]`, the priority
	/// and minimum sizes to `[0, block_max_size]`.
	pub fn clamped(mut self) -> Self {
		self.block_max_size = max(1000, min(MAX_BLOCK_SIZE - 1000, self.block_max_size));
		self.block_priority_size = min(self.block_max_size, self.block_priority_size);
		self.block_min_size = min(self.block_max_size, self.block_min_size);
		self
	}
}

#[cfg(test)]
mod tests {
	use super::MinerOptions;
	use chain::constants::MAX_BLOCK_SIZE;

	#[test]
	fn test_block_max_size_clamps() {
		let options = MinerOptions {
			block_max_size: 10,
			..Default::default()
		}
		.clamped();
		assert_eq!(options.block_max_size, 1000);

		let options = MinerOptions {
			block_max_size: MAX_BLOCK_SIZE * 2,
			..Default::default()
		}
		.clamped();
		assert_eq!(options.block_max_size, MAX_BLOCK_SIZE - 1000);
	}

	#[test]
	fn test_dependent_sizes_clamp_to_max_size() {
		let options = MinerOptions {
			block_max_size: 2_000,
			block_priority_size: 5_000,
			block_min_size: 9_000,
			..Default::default()
		}
		.clamped();
		assert_eq!(options.block_priority_size, 2_000);
		assert_eq!(options.block_min_size, 2_000);
	}
}
