//! Standard-mode template assembly: two-phase mempool selection under the
//! size, sigop, priority and fee constraints, then the miner-paid coinbase.

use crate::block_template::BlockTemplate;
use crate::config::MinerOptions;
use crate::error::Error;
use crate::fee::FeeRate;
use crate::memory_pool::MemoryPool;
use chain::constants::COIN;
use chain::{Block, BlockHeader, IndexedTransaction, Transaction, TransactionInput, TransactionOutput};
use network::ConsensusParams;
use onyxcrypto::SHA256D;
use primitives::hash::H256;
use primitives::time::Time;
use primitives::U256;
use rand::Rng;
use script::{Builder, Opcode, Script};
use std::cmp::{max, Ordering};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use storage::{BlockIndex, ChainApi, CoinsViewCache};

/// The serialized-size accumulator starts here to cover the header and the
/// coinbase.
pub const BLOCK_RESERVED_SIZE: usize = 1000;
/// Headroom the sigop accumulator reserves for the coinbase.
pub const BLOCK_RESERVED_SIGOPS: usize = 100;

static LAST_BLOCK_TX: AtomicU64 = AtomicU64::new(0);
static LAST_BLOCK_SIZE: AtomicU64 = AtomicU64::new(0);

/// Shape of the last standard-mode block this process assembled:
/// `(transactions, bytes)`. Read-only telemetry.
pub fn last_block_info() -> (u64, u64) {
	(
		LAST_BLOCK_TX.load(AtomicOrdering::SeqCst),
		LAST_BLOCK_SIZE.load(AtomicOrdering::SeqCst),
	)
}

/// Transactions with priority above this threshold ride for free: one
/// coin-day of a full coin per 250 bytes.
pub fn allow_free(priority: f64) -> bool {
	priority > COIN as f64 * 144.0 / 250.0
}

/// Legacy signature operation count over all input and output scripts.
pub fn legacy_sigops(transaction: &Transaction) -> usize {
	let inputs = transaction
		.inputs
		.iter()
		.map(|input| Script::new(input.script_sig.clone()).sigops_count(false));
	let outputs = transaction
		.outputs
		.iter()
		.map(|output| Script::new(output.script_pubkey.clone()).sigops_count(false));
	inputs.chain(outputs).sum()
}

/// Accurate sigops contributed by P2SH inputs, resolved through the view.
fn p2sh_sigops(transaction: &Transaction, view: &CoinsViewCache) -> usize {
	if transaction.is_coinbase() {
		return 0;
	}
	transaction
		.inputs
		.iter()
		.map(|input| match view.coin(&input.previous_output) {
			Some(coin) => {
				Script::new(coin.output.script_pubkey).pay_to_script_hash_sigops(&Script::new(input.script_sig.clone()))
			}
			None => 0,
		})
		.sum()
}

/// A random nonce with the top and bottom sixteen bits cleared; solvers
/// use those locally as thread flags and counters.
pub fn random_nonce() -> H256 {
	let seed: [u8; 32] = rand::thread_rng().gen();
	let mut nonce = U256::from_little_endian(&seed);
	nonce = nonce << 32 >> 16;
	nonce.into()
}

/// `header.time = max(median_time_past + 1, now)`. Networks that allow
/// minimum-difficulty blocks re-derive the work requirement from the new
/// time.
pub fn update_time(header: &mut BlockHeader, chain: &dyn ChainApi, consensus: &ConsensusParams, prev: &BlockIndex, time: &dyn Time) {
	header.time = max(prev.median_time_past + 1, time.now_secs());
	if consensus.pow_allow_min_difficulty_blocks {
		header.bits = chain.next_work_required(prev, header.time);
	}
}

struct TxPriority {
	priority: f64,
	fee_rate: FeeRate,
	transaction: IndexedTransaction,
}

/// Max-queue over (priority, fee rate) with a switchable primary key:
/// phase A pops by priority, phase B by fee rate. The switch happens at
/// most once per assembly and is never undone.
struct TxPriorityQueue {
	by_fee: bool,
	entries: Vec<TxPriority>,
}

impl TxPriorityQueue {
	fn new(by_fee: bool) -> Self {
		TxPriorityQueue {
			by_fee,
			entries: Vec::new(),
		}
	}

	fn set_by_fee(&mut self) {
		self.by_fee = true;
	}

	fn push(&mut self, entry: TxPriority) {
		self.entries.push(entry);
	}

	fn pop(&mut self) -> Option<TxPriority> {
		if self.entries.is_empty() {
			return None;
		}
		let mut best = 0;
		for index in 1..self.entries.len() {
			if self.compare(&self.entries[index], &self.entries[best]) == Ordering::Greater {
				best = index;
			}
		}
		Some(self.entries.swap_remove(best))
	}

	fn compare(&self, a: &TxPriority, b: &TxPriority) -> Ordering {
		let by_priority = a.priority.partial_cmp(&b.priority).unwrap_or(Ordering::Equal);
		let by_fee_rate = a.fee_rate.cmp(&b.fee_rate);
		if self.by_fee {
			by_fee_rate.then(by_priority)
		} else {
			by_priority.then(by_fee_rate)
		}
	}
}

/// A transaction held back until every in-pool parent is in the template.
struct OrphanEntry {
	transaction: IndexedTransaction,
	depends_on: HashSet<SHA256D>,
	priority: f64,
	fee_rate: FeeRate,
}

pub struct BlockAssembler<'a> {
	pub consensus: &'a ConsensusParams,
	pub options: &'a MinerOptions,
}

impl<'a> BlockAssembler<'a> {
	pub fn new(consensus: &'a ConsensusParams, options: &'a MinerOptions) -> Self {
		BlockAssembler { consensus, options }
	}

	/// Assembles a standard-mode template against the current tip. The
	/// caller holds both the chain lock and the pool lock for the whole
	/// call.
	pub fn create(
		&self,
		chain: &dyn ChainApi,
		mempool: &MemoryPool,
		time: &dyn Time,
		miner_script: &Script,
	) -> Result<BlockTemplate, Error> {
		let tip = chain.tip();
		let height = tip.height + 1;
		let median_time_past = tip.median_time_past;
		let block_time = time.now_secs();

		let version = match self.options.block_version {
			Some(version) if self.consensus.network.mine_blocks_on_demand() => version,
			_ => chain.block_version(&tip),
		};

		// dummy coinbase keeps index 0 until the real one is ready
		let mut transactions = vec![Transaction::default()];
		let mut transaction_fees: Vec<i64> = vec![-1];
		let mut transaction_sigops: Vec<i64> = vec![-1];

		let mut view = CoinsViewCache::new(chain.coins_view());

		let mut orphans: HashMap<SHA256D, OrphanEntry> = HashMap::new();
		let mut dependers: HashMap<SHA256D, Vec<SHA256D>> = HashMap::new();
		let mut queue = TxPriorityQueue::new(self.options.block_priority_size == 0);

		let lock_time_cutoff = max(median_time_past, block_time);
		for (hash, entry) in mempool.iter() {
			let transaction = &entry.transaction;
			if transaction.raw.is_coinbase() || !transaction.raw.is_final_in_block(height, lock_time_cutoff) {
				continue;
			}

			let mut input_priority = 0f64;
			let mut total_in = 0u64;
			let mut missing_inputs = false;
			let mut depends_on: HashSet<SHA256D> = HashSet::new();
			for input in &transaction.raw.inputs {
				match view.coin(&input.previous_output) {
					Some(coin) => {
						let age = height.saturating_sub(coin.height);
						input_priority += coin.output.value as f64 * age as f64;
						total_in += coin.output.value;
					}
					None => match mempool.transaction_output(&input.previous_output) {
						// has to wait for its in-pool parent
						Some(output) => {
							depends_on.insert(input.previous_output.hash);
							total_in += output.value;
						}
						None => {
							// should never happen: pool transactions connect
							// to the chain or to other pool transactions
							error!(target: "miner", "mempool transaction missing input");
							missing_inputs = true;
							break;
						}
					},
				}
			}
			if missing_inputs {
				continue;
			}
			total_in += transaction.raw.join_split_value_in();

			let (priority_delta, fee_delta) = mempool.deltas(hash);
			let priority = transaction.raw.compute_priority(input_priority) + priority_delta;
			let fee = (total_in as i64)
				.saturating_add(fee_delta)
				.saturating_sub(transaction.raw.total_spends() as i64);
			let fee_rate = FeeRate::from_fee_and_size(fee, transaction.raw.serialized_size());

			if depends_on.is_empty() {
				queue.push(TxPriority {
					priority,
					fee_rate,
					transaction: transaction.clone(),
				});
			} else {
				for parent in &depends_on {
					dependers.entry(*parent).or_default().push(*hash);
				}
				orphans.insert(
					*hash,
					OrphanEntry {
						transaction: transaction.clone(),
						depends_on,
						priority,
						fee_rate,
					},
				);
			}
		}

		// collect transactions into the block
		let mut block_size = BLOCK_RESERVED_SIZE;
		let mut block_sigops = BLOCK_RESERVED_SIGOPS;
		let mut block_tx_count = 0u64;
		let mut fees_total = 0i64;
		let mut sorted_by_fee = self.options.block_priority_size == 0;

		while let Some(TxPriority {
			priority,
			fee_rate,
			transaction,
		}) = queue.pop()
		{
			let tx_size = transaction.raw.serialized_size();
			if block_size + tx_size >= self.options.block_max_size {
				continue;
			}

			let mut tx_sigops = legacy_sigops(&transaction.raw);
			if block_sigops + tx_sigops >= self.consensus.max_block_sigops {
				continue;
			}

			// skip free transactions if we're past the minimum block size
			let (priority_delta, fee_delta) = mempool.deltas(&transaction.hash);
			if sorted_by_fee
				&& priority_delta <= 0.0
				&& fee_delta <= 0
				&& fee_rate < self.options.min_relay_fee
				&& block_size + tx_size >= self.options.block_min_size
			{
				continue;
			}

			// prioritise by fee once past the priority size or once out of
			// high-priority transactions
			if !sorted_by_fee && (block_size + tx_size >= self.options.block_priority_size || !allow_free(priority)) {
				sorted_by_fee = true;
				queue.set_by_fee();
			}

			if !view.have_inputs(&transaction.raw) {
				continue;
			}
			let tx_fees = view.value_in(&transaction.raw) as i64 - transaction.raw.total_spends() as i64;

			tx_sigops += p2sh_sigops(&transaction.raw, &view);
			if block_sigops + tx_sigops >= self.consensus.max_block_sigops {
				continue;
			}

			// the block must only contain transactions valid in new blocks;
			// relay policy does not apply here
			if chain.check_inputs(&transaction.raw, &view, height).is_err() {
				continue;
			}

			view.apply_transaction(&transaction.raw, height);

			if self.options.print_priority {
				info!(target: "miner", "priority {:.1} fee {} txid {}", priority, fee_rate, transaction.hash);
			}

			let hash = transaction.hash;
			transactions.push(transaction.raw);
			transaction_fees.push(tx_fees);
			transaction_sigops.push(tx_sigops as i64);
			block_size += tx_size;
			block_tx_count += 1;
			block_sigops += tx_sigops;
			fees_total += tx_fees;

			// wake dependants whose last dependency was just satisfied
			if let Some(children) = dependers.remove(&hash) {
				for child in children {
					let ready = match orphans.get_mut(&child) {
						Some(orphan) => {
							orphan.depends_on.remove(&hash);
							orphan.depends_on.is_empty()
						}
						None => false,
					};
					if ready {
						let orphan = orphans.remove(&child).expect("checked above");
						queue.push(TxPriority {
							priority: orphan.priority,
							fee_rate: orphan.fee_rate,
							transaction: orphan.transaction,
						});
					}
				}
			}
		}

		LAST_BLOCK_TX.store(block_tx_count, AtomicOrdering::SeqCst);
		LAST_BLOCK_SIZE.store(block_size as u64, AtomicOrdering::SeqCst);
		info!(target: "miner", "create_new_block: total size {}", block_size);

		// the real coinbase: subsidy plus collected fees to the miner
		let coinbase = Transaction {
			version: 1,
			inputs: vec![TransactionInput::coinbase(
				Builder::new().push_num(height).push_opcode(Opcode::OP_0).into_bytes(),
			)],
			outputs: vec![TransactionOutput {
				value: self.consensus.block_subsidy(height) + fees_total as u64,
				script_pubkey: miner_script.to_bytes(),
			}],
			..Default::default()
		};
		transaction_sigops[0] = legacy_sigops(&coinbase) as i64;
		transactions[0] = coinbase;
		transaction_fees[0] = -fees_total;

		let mut header = BlockHeader {
			version,
			previous_header_hash: tip.hash,
			merkle_root_hash: Default::default(),
			reserved_hash: Default::default(),
			time: block_time,
			bits: Default::default(),
			nonce: random_nonce(),
			solution: Default::default(),
		};
		update_time(&mut header, chain, self.consensus, &tip, time);
		header.bits = chain.next_work_required(&tip, header.time);

		let block = Block::new(header, transactions);
		chain
			.test_block_validity(&block, &tip)
			.map_err(|e| Error::TemplateInvalid(e.into()))?;

		Ok(BlockTemplate {
			block,
			transaction_fees,
			transaction_sigops,
			height,
		})
	}
}
