use crate::network::{Magic, Network};
use chain::constants::{COIN, MAX_BLOCK_SIGOPS, MAX_BLOCK_SIZE};
use onyxcrypto::equihash;
use onyxcrypto::{dhash256, Hash, SHA256D};

lazy_static! {
	/// Marker carried in the reserved header field of every fork-window
	/// block. Regular blocks keep the field zeroed.
	pub static ref FORK_BLOCK_SENTINEL: SHA256D = SHA256D::from_inner(*b"ONYXONYXONYXONYXONYXONYXONYXONYX");
	/// Provenance hash embedded in the script_sig of the first synthetic
	/// coinbase of each fork block.
	pub static ref PROCESS_ID_HASH: SHA256D = dhash256(b"onyx fork balance inheritance v1");
}

#[derive(Debug, Clone)]
/// Parameters that influence chain consensus.
pub struct ConsensusParams {
	/// Network.
	pub network: Network,
	/// Equihash parameter n.
	pub equihash_n: u32,
	/// Equihash parameter k.
	pub equihash_k: u32,
	/// Number of blocks between subsidy halvings.
	pub subsidy_halving_interval: u32,
	/// First block height of the fork window.
	pub fork_start_height: u32,
	/// Number of blocks in the fork window.
	pub fork_height_range: u32,
	/// Difficulty resets to the minimum when a block is slow to arrive.
	pub pow_allow_min_difficulty_blocks: bool,
	/// Maximum serialized block size.
	pub max_block_size: usize,
	/// Maximum number of sigops in a single block.
	pub max_block_sigops: usize,
	/// Number of blocks after creation that a coinbase transaction becomes spendable.
	pub coinbase_maturity: u32,
}

impl ConsensusParams {
	pub fn new(network: Network) -> Self {
		match network {
			Network::Mainnet => ConsensusParams {
				network,
				equihash_n: 200,
				equihash_k: 9,
				subsidy_halving_interval: 840_000,
				fork_start_height: 100_000,
				fork_height_range: 8_000,
				pow_allow_min_difficulty_blocks: false,
				max_block_size: MAX_BLOCK_SIZE,
				max_block_sigops: MAX_BLOCK_SIGOPS,
				coinbase_maturity: 100,
			},
			Network::Testnet => ConsensusParams {
				network,
				equihash_n: 200,
				equihash_k: 9,
				subsidy_halving_interval: 840_000,
				fork_start_height: 2_000,
				fork_height_range: 8_000,
				pow_allow_min_difficulty_blocks: true,
				max_block_size: MAX_BLOCK_SIZE,
				max_block_sigops: MAX_BLOCK_SIGOPS,
				coinbase_maturity: 100,
			},
			Network::Regtest | Network::Unitest => ConsensusParams {
				network,
				equihash_n: 48,
				equihash_k: 5,
				subsidy_halving_interval: 150,
				fork_start_height: 200,
				fork_height_range: 10,
				pow_allow_min_difficulty_blocks: true,
				max_block_size: MAX_BLOCK_SIZE,
				max_block_sigops: MAX_BLOCK_SIGOPS,
				coinbase_maturity: 100,
			},
		}
	}

	pub fn magic(&self) -> Magic {
		self.network.magic()
	}

	pub fn equihash_params(&self) -> equihash::Params {
		equihash::Params::new(self.equihash_n, self.equihash_k)
	}

	/// Fork-mode mining applies inside `[fork_start_height, fork_start_height + fork_height_range)`.
	pub fn is_fork_block(&self, height: u32) -> bool {
		height >= self.fork_start_height && height < self.fork_start_height + self.fork_height_range
	}

	/// Height of the last block of the fork window. Its snapshot file is the
	/// only one allowed to hold fewer records than the per-block cap.
	pub fn is_last_fork_block(&self, height: u32) -> bool {
		height + 1 == self.fork_start_height + self.fork_height_range
	}

	/// Relative position of a height inside the fork window, for logging.
	pub fn fork_height_offset(&self, height: u32) -> u32 {
		height.saturating_sub(self.fork_start_height)
	}

	pub fn block_subsidy(&self, height: u32) -> u64 {
		let halvings = height / self.subsidy_halving_interval;
		if halvings >= 64 {
			return 0;
		}
		(125 * COIN / 10) >> halvings
	}
}

impl Default for ConsensusParams {
	fn default() -> Self {
		ConsensusParams::new(Network::default())
	}
}

#[cfg(test)]
mod tests {
	use super::super::Network;
	use super::{ConsensusParams, FORK_BLOCK_SENTINEL, PROCESS_ID_HASH};

	#[test]
	fn test_fork_window_bounds() {
		let params = ConsensusParams::new(Network::Regtest);
		assert!(!params.is_fork_block(199));
		assert!(params.is_fork_block(200));
		assert!(params.is_fork_block(209));
		assert!(!params.is_fork_block(210));

		assert!(params.is_last_fork_block(209));
		assert!(!params.is_last_fork_block(208));
	}

	#[test]
	fn test_block_subsidy_halves() {
		let params = ConsensusParams::new(Network::Regtest);
		assert_eq!(params.block_subsidy(1), 1_250_000_000);
		assert_eq!(params.block_subsidy(150), 625_000_000);
		assert_eq!(params.block_subsidy(64 * 150), 0);
	}

	#[test]
	fn test_sentinels_are_distinct() {
		assert!(*FORK_BLOCK_SENTINEL != *PROCESS_ID_HASH);
	}

	#[test]
	fn test_equihash_params_per_network() {
		assert_eq!(ConsensusParams::new(Network::Mainnet).equihash_params().solution_size(), 1344);
		assert_eq!(ConsensusParams::new(Network::Regtest).equihash_params().solution_size(), 36);
	}
}
