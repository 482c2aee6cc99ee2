use chain::{Block, BlockHeader, OutPoint, Transaction, TransactionInput, TransactionOutput};
use network::{ConsensusParams, Network};
use onyxcrypto::dhash256;
use primitives::compact::Compact;
use storage::{BlockIndex, ChainApi, Coin, CoinsView, CoinsViewCache, Error};

/// Work requirement handed out for every block; easy enough that any
/// Equihash solution passes.
const EASY_BITS: u32 = 0x207fffff;

/// In-memory chain state for tests: a linear chain, a flat coin map, a
/// constant work requirement and permissive contextual checks.
pub struct MemoryChain {
	consensus: ConsensusParams,
	indices: Vec<BlockIndex>,
	blocks: Vec<Block>,
	times: Vec<u32>,
	coins: std::collections::HashMap<OutPoint, Coin>,
	funding_counter: u64,
}

fn genesis_block() -> Block {
	let coinbase = Transaction {
		version: 1,
		inputs: vec![TransactionInput::coinbase(vec![0x00].into())],
		outputs: vec![TransactionOutput {
			value: 0,
			script_pubkey: vec![0x51].into(),
		}],
		..Default::default()
	};
	let header = BlockHeader {
		version: 4,
		previous_header_hash: Default::default(),
		merkle_root_hash: coinbase.hash(),
		reserved_hash: Default::default(),
		time: 1_560_000_000,
		bits: EASY_BITS.into(),
		nonce: Default::default(),
		solution: Default::default(),
	};
	Block::new(header, vec![coinbase])
}

impl MemoryChain {
	pub fn new(network: Network) -> Self {
		let genesis = genesis_block();
		let index = BlockIndex::new(genesis.hash(), 0, genesis.block_header.time - 1);
		MemoryChain {
			consensus: ConsensusParams::new(network),
			times: vec![genesis.block_header.time],
			indices: vec![index],
			blocks: vec![genesis],
			coins: Default::default(),
			funding_counter: 0,
		}
	}

	/// A chain whose tip sits at `height` without materializing the blocks
	/// in between; handy for fork-window scenarios.
	pub fn with_height(network: Network, height: u32) -> Self {
		let mut chain = MemoryChain::new(network);
		if height > 0 {
			let hash = dhash256(&height.to_le_bytes());
			chain.indices.push(BlockIndex::new(hash, height, chain.times[0]));
			chain.times.push(chain.times[0] + height);
		}
		chain
	}

	/// Creates a spendable coin out of thin air and returns its outpoint.
	pub fn fund(&mut self, value: u64, height: u32) -> OutPoint {
		self.funding_counter += 1;
		let outpoint = OutPoint {
			hash: dhash256(&self.funding_counter.to_le_bytes()),
			index: 0,
		};
		self.coins.insert(
			outpoint.clone(),
			Coin {
				output: TransactionOutput {
					value,
					script_pubkey: vec![0x51].into(),
				},
				height,
				is_coinbase: false,
			},
		);
		outpoint
	}

	pub fn block_count(&self) -> usize {
		self.blocks.len()
	}

	pub fn tip_block(&self) -> &Block {
		self.blocks.last().expect("genesis is always present")
	}

	fn median_time_past(&self) -> u32 {
		let mut recent: Vec<u32> = self.times.iter().rev().take(11).cloned().collect();
		recent.sort_unstable();
		recent[recent.len() / 2]
	}
}

impl CoinsView for MemoryChain {
	fn coin(&self, outpoint: &OutPoint) -> Option<Coin> {
		self.coins.get(outpoint).cloned()
	}
}

impl ChainApi for MemoryChain {
	fn tip(&self) -> BlockIndex {
		self.indices.last().expect("genesis is always present").clone()
	}

	fn next_work_required(&self, _prev: &BlockIndex, _time: u32) -> Compact {
		EASY_BITS.into()
	}

	fn block_version(&self, _prev: &BlockIndex) -> u32 {
		4
	}

	fn coins_view(&self) -> &dyn CoinsView {
		self
	}

	fn check_inputs(&self, _transaction: &Transaction, _view: &CoinsViewCache, _height: u32) -> Result<(), Error> {
		Ok(())
	}

	fn test_block_validity(&self, block: &Block, prev: &BlockIndex) -> Result<(), Error> {
		if block.transactions.is_empty() {
			return Err(Error::InvalidBlock("empty body".into()));
		}
		if !block.transactions[0].is_coinbase() {
			return Err(Error::InvalidBlock("first transaction is not a coinbase".into()));
		}
		// fork-window bodies consist entirely of coinbase-shaped transactions
		if !self.consensus.is_fork_block(prev.height + 1) && block.transactions.iter().skip(1).any(Transaction::is_coinbase) {
			return Err(Error::InvalidBlock("unexpected extra coinbase".into()));
		}
		if block.size() > self.consensus.max_block_size {
			return Err(Error::InvalidBlock("oversized block".into()));
		}
		Ok(())
	}

	fn process_new_block(&mut self, block: &Block) -> Result<(), Error> {
		let tip = self.tip();
		if block.block_header.previous_header_hash != tip.hash {
			return Err(Error::BlockRejected("does not extend the active tip".into()));
		}
		let height = tip.height + 1;
		for transaction in &block.transactions {
			for input in &transaction.inputs {
				self.coins.remove(&input.previous_output);
			}
			let hash = transaction.hash();
			for (index, output) in transaction.outputs.iter().enumerate() {
				self.coins.insert(
					OutPoint {
						hash,
						index: index as u32,
					},
					Coin {
						output: output.clone(),
						height,
						is_coinbase: transaction.is_coinbase(),
					},
				);
			}
		}
		self.times.push(block.block_header.time);
		self.indices.push(BlockIndex::new(block.hash(), height, self.median_time_past()));
		self.blocks.push(block.clone());
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::MemoryChain;
	use chain::{Block, Transaction, TransactionInput, TransactionOutput};
	use network::Network;
	use storage::ChainApi;

	fn next_block(chain: &MemoryChain, time: u32) -> Block {
		let coinbase = Transaction {
			version: 1,
			inputs: vec![TransactionInput::coinbase(vec![0x01].into())],
			outputs: vec![TransactionOutput {
				value: 10,
				script_pubkey: vec![0x51].into(),
			}],
			..Default::default()
		};
		let mut block = Block::new(chain.tip_block().block_header.clone(), vec![coinbase]);
		block.block_header.previous_header_hash = chain.tip().hash;
		block.block_header.time = time;
		block.block_header.merkle_root_hash = block.merkle_root();
		block
	}

	#[test]
	fn test_process_new_block_advances_tip() {
		let mut chain = MemoryChain::new(Network::Unitest);
		let block = next_block(&chain, 1_560_000_100);
		chain.process_new_block(&block).unwrap();
		assert_eq!(chain.tip().height, 1);
		assert_eq!(chain.tip().hash, block.hash());
	}

	#[test]
	fn test_stale_block_rejected() {
		let mut chain = MemoryChain::new(Network::Unitest);
		let block = next_block(&chain, 1_560_000_100);
		chain.process_new_block(&block).unwrap();
		// same parent again
		assert!(chain.process_new_block(&block).is_err());
	}

	#[test]
	fn test_fabricated_height() {
		let chain = MemoryChain::with_height(Network::Unitest, 199);
		assert_eq!(chain.tip().height, 199);
	}
}
