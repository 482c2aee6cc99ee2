//! Fork-mode template assembly: the block body is rebuilt from a
//! pre-computed UTXO snapshot rather than selected from the pool.

use crate::block_assembler::{legacy_sigops, random_nonce, update_time, BLOCK_RESERVED_SIGOPS, BLOCK_RESERVED_SIZE};
use crate::block_template::BlockTemplate;
use crate::config::MinerOptions;
use crate::error::Error;
use crate::fork_coinbase::{dummy_fork_coinbase, fork_coinbase};
use crate::snapshot::{SnapshotReader, SnapshotRecord};
use network::{ConsensusParams, FORK_BLOCK_SENTINEL};
use chain::{Block, BlockHeader};
use primitives::time::Time;
use storage::ChainRef;

pub struct ForkBlockAssembler<'a> {
	pub consensus: &'a ConsensusParams,
	pub options: &'a MinerOptions,
}

impl<'a> ForkBlockAssembler<'a> {
	pub fn new(consensus: &'a ConsensusParams, options: &'a MinerOptions) -> Self {
		ForkBlockAssembler { consensus, options }
	}

	/// Builds a fork-mode template bound to the current tip.
	///
	/// Snapshot reading is file io, so the chain lock is taken only to peek
	/// at the tip, dropped while the body is filled from the file, and
	/// retaken to bind the header. If the tip moved in between, the
	/// template is discarded and the whole build restarts.
	pub fn create(&self, chain: &ChainRef, time: &dyn Time) -> Result<BlockTemplate, Error> {
		let mut tip_height = chain.lock().tip().height;

		loop {
			let snapped = tip_height;
			let mut template = self.build_for_height(snapped + 1)?;

			{
				let chain = chain.lock();
				let tip = chain.tip();
				tip_height = tip.height;
				if tip_height != snapped {
					warn!(
						target: "miner",
						"tip changed from {} to {} while generating block template", snapped, tip_height
					);
					continue;
				}

				// tip still ours - fill in the final details
				let header = &mut template.block.block_header;
				header.previous_header_hash = tip.hash;
				update_time(header, &*chain, self.consensus, &tip, time);
				header.bits = chain.next_work_required(&tip, header.time);
				header.version = chain.block_version(&tip);

				chain
					.test_block_validity(&template.block, &tip)
					.map_err(|e| Error::TemplateInvalid(e.into()))?;
				return Ok(template);
			}
		}
	}

	/// The inner builder: fills a body for `height` from the snapshot file.
	/// Corruption stops the fill but keeps what was already assembled, even
	/// when that is only the dummy coinbase.
	fn build_for_height(&self, height: u32) -> Result<BlockTemplate, Error> {
		let fork_offset = self.consensus.fork_height_offset(height);
		let fork_range = self.consensus.fork_height_range;
		let shielded = self.options.shielded_start_block == Some(height);
		let reader = SnapshotReader::open(
			&self.options.snapshot_dir,
			height,
			shielded,
			self.consensus.is_last_fork_block(height),
			self.options.fork_coinbases_per_block,
		)?;

		// fork blocks ignore -blockmaxsize and always fill to the consensus cap
		let block_max_size = self.consensus.max_block_size - BLOCK_RESERVED_SIZE;

		let mut transactions = vec![dummy_fork_coinbase(height)?];
		let mut transaction_fees: Vec<i64> = vec![-1];
		let mut transaction_sigops: Vec<i64> = vec![-1];

		let mut block_size = BLOCK_RESERVED_SIZE;
		let mut block_sigops = BLOCK_RESERVED_SIGOPS;
		let mut block_tx_count = 0u64;
		let mut block_total_amount = 0u64;

		for record in reader {
			let record = match record {
				Ok(record) => record,
				Err(error) => {
					error!(
						target: "miner",
						"create_new_fork_block [{}, {} of {}]: {}", height, fork_offset, fork_range, error
					);
					break;
				}
			};

			let amount = match &record {
				SnapshotRecord::Transparent { amount, .. } => *amount,
				SnapshotRecord::Shielded(_) => 0,
			};

			let transaction = match fork_coinbase(height, block_tx_count, record) {
				Ok(transaction) => transaction,
				Err(error) => {
					error!(
						target: "miner",
						"create_new_fork_block [{}, {} of {}]: {}: skipping record", height, fork_offset, fork_range, error
					);
					continue;
				}
			};

			let tx_size = transaction.serialized_size();
			if block_size + tx_size >= block_max_size {
				error!(
					target: "miner",
					"create_new_fork_block [{}, {} of {}]: {}: block would exceed max size", height, fork_offset, fork_range, block_tx_count
				);
				break;
			}

			let tx_sigops = legacy_sigops(&transaction);
			if block_sigops + tx_sigops >= self.consensus.max_block_sigops {
				error!(
					target: "miner",
					"create_new_fork_block [{}, {} of {}]: {}: block would exceed max sigops", height, fork_offset, fork_range, block_tx_count
				);
				break;
			}

			transactions.push(transaction);
			transaction_fees.push(0);
			transaction_sigops.push(tx_sigops as i64);
			block_size += tx_size;
			block_sigops += tx_sigops;
			block_total_amount += amount;
			block_tx_count += 1;
		}

		info!(
			target: "miner",
			"create_new_fork_block [{}, {} of {}]: txns={} size={} amount={} sigops={}",
			height, fork_offset, fork_range, block_tx_count, block_size, block_total_amount, block_sigops
		);

		let header = BlockHeader {
			version: 0,
			previous_header_hash: Default::default(),
			merkle_root_hash: Default::default(),
			reserved_hash: *FORK_BLOCK_SENTINEL,
			time: 0,
			bits: Default::default(),
			nonce: random_nonce(),
			solution: Default::default(),
		};

		Ok(BlockTemplate {
			block: Block::new(header, transactions),
			transaction_fees,
			transaction_sigops,
			height,
		})
	}
}
