use crate::block_index::BlockIndex;
use crate::coins::{CoinsView, CoinsViewCache};
use crate::error::Error;
use chain::{Block, Transaction};
use parking_lot::Mutex;
use primitives::compact::Compact;
use std::sync::Arc;

/// The slice of the node the template builders and the mining loop consume.
///
/// Implementations sit behind a single coarse mutex (`ChainRef`): builders
/// lock it to snapshot the tip, release it for heavy work, and lock it again
/// to finalize and submit. The tip may move between those sections; callers
/// detect that by comparing `tip()` results.
pub trait ChainApi {
	/// Best block of the active chain.
	fn tip(&self) -> BlockIndex;

	/// Difficulty required of a header extending `prev` at `time`.
	fn next_work_required(&self, prev: &BlockIndex, time: u32) -> Compact;

	/// Version a new block extending `prev` should carry.
	fn block_version(&self, prev: &BlockIndex) -> u32;

	/// Unspent transparent outputs of the active chain.
	fn coins_view(&self) -> &dyn CoinsView;

	/// Contextual input checks under the mandatory script verification
	/// flags, evaluated against the selection overlay.
	fn check_inputs(&self, transaction: &Transaction, view: &CoinsViewCache, height: u32) -> Result<(), Error>;

	/// Preflight of an assembled template. Proof of work and the merkle
	/// root are not checked; the body and contextual rules are.
	fn test_block_validity(&self, block: &Block, prev: &BlockIndex) -> Result<(), Error>;

	/// Hands a solved block to the node, as if received from a peer.
	fn process_new_block(&mut self, block: &Block) -> Result<(), Error>;
}

/// The coarse chain lock shared by every miner worker.
pub type ChainRef = Arc<Mutex<dyn ChainApi + Send>>;
