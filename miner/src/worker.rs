//! The per-worker mining loop: build a template for the current mode,
//! drive the Equihash solver across nonces, submit solutions, and start
//! over whenever the template goes stale.

use crate::block_assembler::{update_time, BlockAssembler};
use crate::error::Error;
use crate::fork_assembler::ForkBlockAssembler;
use crate::miner::MinerContext;
use crate::solver::create_solver;
use crate::wallet::{miner_script, NoKeys, ReserveScript};
use chain::constants::{COIN, MAX_COINBASE_SCRIPT_SIG_SIZE};
use chain::Block;
use onyxcrypto::equihash::SolveResult;
use onyxcrypto::SHA256D;
use primitives::bytes::Bytes;
use primitives::compact::Compact;
use primitives::U256;
use script::Builder;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use storage::BlockIndex;

/// Trailing marker appended to the standard-mode coinbase script_sig.
const COINBASE_FLAGS: &[u8] = b"/P2SH/";

/// Per-worker extra-nonce: widens the coinbase search space without
/// reselecting transactions. The counter restarts whenever the worker
/// begins mining on a new parent block.
#[derive(Default)]
pub struct ExtraNonce {
	hash_prev_block: SHA256D,
	counter: u32,
}

impl ExtraNonce {
	pub fn increment(&mut self, block: &mut Block, prev: &BlockIndex) {
		if self.hash_prev_block != block.block_header.previous_header_hash {
			self.counter = 0;
			self.hash_prev_block = block.block_header.previous_header_hash;
		}
		self.counter += 1;

		// height first in the coinbase, required since block version 2
		let height = prev.height + 1;
		let script_sig = Builder::new()
			.push_num(height)
			.push_num(self.counter as i64)
			.push_data(COINBASE_FLAGS)
			.into_bytes();
		assert!(script_sig.len() <= MAX_COINBASE_SCRIPT_SIG_SIZE);

		block.transactions[0].inputs[0].script_sig = script_sig;
		block.block_header.merkle_root_hash = block.merkle_root();
	}
}

fn format_money(value: u64) -> String {
	format!("{}.{:08}", value / COIN, value % COIN)
}

fn compact_to_target(bits: Compact) -> U256 {
	match bits.to_u256() {
		Ok(target) | Err(target) => target,
	}
}

/// Hands the solved block to the node. The tip is re-checked under the
/// chain lock first: a mismatch means someone else extended the chain
/// while we were solving, and the block is quietly dropped.
fn submit_block(context: &MinerContext, block: &Block, reserve: &mut dyn ReserveScript) -> Result<(), Error> {
	info!(target: "miner", "generated {}", format_money(block.transactions[0].outputs[0].value));

	let mut chain = context.chain.lock();
	if block.block_header.previous_header_hash != chain.tip().hash {
		return Err(Error::StaleBlock);
	}

	if context.options.miner_address.is_none() {
		// the reserved key is ours for good now
		reserve.keep();
	}

	chain.process_new_block(block).map_err(|e| Error::BlockNotAccepted(e.into()))
}

/// The worker body. Returns when the supervisor raises `stop` or on an
/// operator-level failure (bad fork data, exhausted keypool).
pub(crate) fn miner_worker(context: Arc<MinerContext>, stop: Arc<AtomicBool>) {
	info!(target: "miner", "onyx miner started");

	// each worker owns a reserved key and an extra-nonce counter
	let mut reserve: Box<dyn ReserveScript> = match &context.wallet {
		Some(wallet) => wallet.reserve_script(),
		None => Box::new(NoKeys),
	};
	let mut extra_nonce = ExtraNonce::default();

	let equihash_params = context.consensus.equihash_params();
	let solver = create_solver(context.options.solver, equihash_params);
	info!(
		target: "miner",
		"using equihash solver \"{}\" with n = {}, k = {}",
		solver.name(), context.consensus.equihash_n, context.consensus.equihash_k
	);

	let connection = context.tip_notifier.connect();
	let mut fork_mode_started = false;

	'mining: loop {
		if stop.load(Ordering::SeqCst) {
			break;
		}

		// busy-wait for the network to come online so we don't waste time
		// mining on an obsolete chain; regtest flies solo
		if context.consensus.network.mining_requires_peers() {
			loop {
				if stop.load(Ordering::SeqCst) {
					break 'mining;
				}
				let nodes_empty = context.network_state.peers_count() == 0;
				if !nodes_empty && (context.options.fork_mine || !context.network_state.is_synchronizing()) {
					break;
				}
				thread::sleep(Duration::from_secs(1));
			}
		}

		let tip_height = context.chain.lock().tip().height;
		let is_next_block_fork = context.consensus.is_fork_block(tip_height + 1);
		let mut transactions_updated_last = 0u32;

		let mut template = if is_next_block_fork {
			if !fork_mode_started {
				info!(target: "miner", "onyx miner: switching into fork mode");
				fork_mode_started = true;
			}

			match ForkBlockAssembler::new(&context.consensus, &context.options).create(&context.chain, &*context.time) {
				Ok(template) => template,
				Err(Error::SnapshotMissing(height)) => {
					trace!(target: "miner", "utxo snapshot for height {} not ready, retrying", height);
					thread::sleep(Duration::from_secs(1));
					continue 'mining;
				}
				Err(error) => {
					error!(target: "miner", "onyx miner: cannot create fork block: {}", error);
					return;
				}
			}
		} else {
			if fork_mode_started {
				info!(target: "miner", "onyx miner: fork is done - switching back to regular mining");
				fork_mode_started = false;
			}

			let script = match miner_script(&context.options, &mut *reserve) {
				Ok(script) => script,
				Err(error) => {
					// operator intervention needed, stop this worker
					error!(target: "miner", "onyx miner: {}", error);
					return;
				}
			};

			let chain = context.chain.lock();
			let mempool = context.mempool.read();
			transactions_updated_last = mempool.transactions_updated();
			match BlockAssembler::new(&context.consensus, &context.options).create(&*chain, &*mempool, &*context.time, &script) {
				Ok(template) => template,
				Err(error) => {
					error!(target: "miner", "onyx miner: cannot create block template: {}", error);
					continue 'mining;
				}
			}
		};

		// the template binds to this parent; if the tip has already moved,
		// start over instead of mining a stale block
		let prev = context.chain.lock().tip();
		if prev.hash != template.block.block_header.previous_header_hash {
			continue 'mining;
		}

		if is_next_block_fork {
			template.block.block_header.merkle_root_hash = template.block.merkle_root();
			info!(
				target: "miner",
				"running onyx miner with {} forking transactions in block ({} bytes)",
				template.block.transactions.len(),
				template.size()
			);
		} else {
			info!(
				target: "miner",
				"running onyx miner with {} transactions in block ({} bytes)",
				template.block.transactions.len(),
				template.size()
			);
			extra_nonce.increment(&mut template.block, &prev);
		}

		//
		// search
		//
		let start_time = context.time.now().as_secs();
		let mut hash_target = compact_to_target(template.block.block_header.bits);

		loop {
			// the header prefix changes with every time/bits update
			let input = template.block.block_header.equihash_input();
			let nonce = template.block.block_header.nonce;
			trace!(target: "miner", "running equihash solver \"{}\" with nonce = {}", solver.name(), nonce);

			let result = {
				let block = &mut template.block;
				let mut valid_block = |solution: Bytes| -> bool {
					trace!(target: "miner", "checking solution against target");
					block.block_header.solution = solution;
					let hash = block.hash();
					if U256::from_little_endian(&hash[..]) > hash_target {
						return false;
					}

					// found a solution
					info!(target: "miner", "proof-of-work found\n   hash: {}\n target: {:x}", hash, hash_target);
					match submit_block(&context, block, &mut *reserve) {
						// ignore the chain update caused by our own block
						Ok(()) => connection.reset(),
						Err(error) => error!(target: "miner", "onyx miner: {}", error),
					}

					// in on-demand mode one regular block is all we want
					if context.consensus.network.mine_blocks_on_demand() && !is_next_block_fork {
						stop.store(true, Ordering::SeqCst);
					}
					true
				};
				let cancelled = || connection.cancelled() || stop.load(Ordering::SeqCst);
				solver.solve(&input, &nonce, &mut valid_block, &cancelled)
			};

			match result {
				// the remaining solutions would be stale, rebuild
				SolveResult::Found => break,
				SolveResult::Cancelled => {
					trace!(target: "miner", "equihash solver cancelled");
					connection.reset();
				}
				SolveResult::Exhausted => (),
			}

			// check for stop or if the block needs to be rebuilt
			if stop.load(Ordering::SeqCst) {
				break 'mining;
			}
			if context.consensus.network.mining_requires_peers() && context.network_state.peers_count() == 0 {
				break;
			}
			let nonce_bits = U256::from(template.block.block_header.nonce);
			if nonce_bits & U256::from(0xffffu64) == U256::from(0xffffu64) {
				break;
			}
			if context.mempool.read().transactions_updated() != transactions_updated_last
				&& context.time.now().as_secs() - start_time > 60
			{
				break;
			}
			if context.chain.lock().tip().hash != prev.hash {
				break;
			}

			// update nonce and time
			template.block.block_header.nonce = (U256::from(template.block.block_header.nonce) + U256::one()).into();
			{
				let chain = context.chain.lock();
				update_time(&mut template.block.block_header, &*chain, &context.consensus, &prev, &*context.time);
			}
			if context.consensus.pow_allow_min_difficulty_blocks {
				// changing the time can change the work required on testnet
				hash_target = compact_to_target(template.block.block_header.bits);
			}
		}
	}

	info!(target: "miner", "onyx miner terminated");
}

#[cfg(test)]
mod tests {
	use super::{compact_to_target, format_money, ExtraNonce};
	use chain::{Block, BlockHeader, Transaction, TransactionInput, TransactionOutput};
	use primitives::U256;
	use storage::BlockIndex;

	fn block_with_coinbase() -> Block {
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
			merkle_root_hash: Default::default(),
			reserved_hash: Default::default(),
			time: 0,
			bits: 0x207fffff.into(),
			nonce: Default::default(),
			solution: Default::default(),
		};
		Block::new(header, vec![coinbase])
	}

	#[test]
	fn test_extra_nonce_advances_and_rebinds_merkle() {
		let mut block = block_with_coinbase();
		let prev = BlockIndex::default();
		let mut extra_nonce = ExtraNonce::default();

		extra_nonce.increment(&mut block, &prev);
		let first_sig = block.transactions[0].inputs[0].script_sig.clone();
		assert_eq!(block.block_header.merkle_root_hash, block.merkle_root());

		extra_nonce.increment(&mut block, &prev);
		let second_sig = block.transactions[0].inputs[0].script_sig.clone();
		assert!(first_sig != second_sig);
	}

	#[test]
	fn test_extra_nonce_resets_on_new_parent() {
		let mut block = block_with_coinbase();
		let prev = BlockIndex::default();
		let mut extra_nonce = ExtraNonce::default();

		extra_nonce.increment(&mut block, &prev);
		extra_nonce.increment(&mut block, &prev);
		let sig_at_two = block.transactions[0].inputs[0].script_sig.clone();

		// new parent: the counter restarts
		let mut other = block_with_coinbase();
		other.block_header.previous_header_hash = onyxcrypto::dhash256(b"other parent");
		extra_nonce.increment(&mut other, &prev);
		extra_nonce.increment(&mut other, &prev);
		assert_eq!(other.transactions[0].inputs[0].script_sig, sig_at_two);
	}

	#[test]
	fn test_format_money() {
		assert_eq!(format_money(1_250_000_000), "12.50000000");
		assert_eq!(format_money(1), "0.00000001");
	}

	#[test]
	fn test_compact_to_target_ignores_overflow_flag() {
		// regtest bits expand to a huge target
		let target = compact_to_target(0x207fffff.into());
		assert!(target > U256::from(u64::max_value()));
	}
}
