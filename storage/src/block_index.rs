use onyxcrypto::SHA256D;

/// Everything the miner reads from a block of the active chain.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BlockIndex {
	pub hash: SHA256D,
	pub height: u32,
	/// Median time of the past eleven blocks, the lower bound for a
	/// successor's timestamp.
	pub median_time_past: u32,
}

impl BlockIndex {
	pub fn new(hash: SHA256D, height: u32, median_time_past: u32) -> Self {
		BlockIndex {
			hash,
			height,
			median_time_past,
		}
	}
}
