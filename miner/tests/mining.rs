//! End-to-end mining scenarios against an in-memory chain.

extern crate chain;
extern crate miner;
extern crate network;
extern crate parking_lot;
extern crate primitives;
extern crate storage;
extern crate tempfile;
extern crate test_data;

use miner::{MemoryPool, Miner, MinerContext, MinerOptions, NetworkState, TipNotifier};
use network::{ConsensusParams, Network, FORK_BLOCK_SENTINEL, PROCESS_ID_HASH};
use parking_lot::{Mutex, RwLock};
use primitives::time::RealTime;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use storage::{ChainApi, ChainRef};
use test_data::MemoryChain;

struct AlwaysOnline;

impl NetworkState for AlwaysOnline {
	fn peers_count(&self) -> usize {
		1
	}

	fn is_synchronizing(&self) -> bool {
		false
	}
}

fn wait_for<F>(predicate: F, seconds: u64) -> bool
where
	F: Fn() -> bool,
{
	for _ in 0..seconds * 10 {
		if predicate() {
			return true;
		}
		thread::sleep(Duration::from_millis(100));
	}
	predicate()
}

fn context(chain: ChainRef, options: MinerOptions) -> MinerContext {
	MinerContext {
		chain,
		mempool: Arc::new(RwLock::new(MemoryPool::new())),
		network_state: Arc::new(AlwaysOnline),
		consensus: ConsensusParams::new(Network::Unitest),
		options,
		time: Arc::new(RealTime),
		tip_notifier: Arc::new(TipNotifier::new()),
		wallet: None,
	}
}

fn write_snapshot(dir: &Path, height: u32, records: &[(u64, &[u8])]) {
	let mut data = Vec::new();
	for (amount, script) in records {
		data.extend_from_slice(&amount.to_le_bytes());
		data.extend_from_slice(&(script.len() as u64).to_le_bytes());
		data.extend_from_slice(script);
		data.push(b'\n');
	}
	fs::write(miner::utxo_file_name(dir, height), data).unwrap();
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
	haystack.windows(needle.len()).any(|window| window == needle)
}

#[test]
fn test_standard_block_mined_and_submitted_on_demand() {
	let chain_impl = Arc::new(Mutex::new(MemoryChain::new(Network::Unitest)));
	let chain: ChainRef = chain_impl.clone();

	let options = MinerOptions {
		miner_address: Some("16meyfSoQV6twkAAxPe51RtMVz7PGRmWna".into()),
		..Default::default()
	};
	let mut miner = Miner::new(context(chain.clone(), options));
	miner.restart(true, 1);
	assert!(miner.is_mining());

	assert!(wait_for(|| chain.lock().tip().height == 1, 60), "no block mined in time");
	miner.shutdown();

	let guard = chain_impl.lock();
	let block = guard.tip_block();
	let consensus = ConsensusParams::new(Network::Unitest);
	// a regular block: zeroed reserved hash, miner-paid coinbase, solved header
	assert_eq!(block.block_header.reserved_hash, Default::default());
	assert!(block.transactions[0].is_coinbase());
	assert_eq!(block.transactions[0].outputs[0].value, consensus.block_subsidy(1));
	assert_eq!(
		block.block_header.solution.len(),
		consensus.equihash_params().solution_size()
	);
}

#[test]
fn test_fork_block_mined_from_snapshot() {
	let dir = tempfile::tempdir().unwrap();
	write_snapshot(dir.path(), 200, &[(0, &[0x51]), (100, &[0x52]), (250, &[0x53])]);

	let chain_impl = Arc::new(Mutex::new(MemoryChain::with_height(Network::Unitest, 199)));
	let chain: ChainRef = chain_impl.clone();

	let options = MinerOptions {
		snapshot_dir: dir.path().to_path_buf(),
		..Default::default()
	};
	let mut miner = Miner::new(context(chain.clone(), options));
	miner.restart(true, 1);

	assert!(wait_for(|| chain.lock().tip().height == 200, 60), "no fork block mined in time");
	// height 201 has no snapshot file; the worker keeps retrying until shutdown
	miner.shutdown();

	let guard = chain_impl.lock();
	let block = guard.tip_block();
	assert_eq!(block.block_header.reserved_hash, *FORK_BLOCK_SENTINEL);
	assert_eq!(block.transactions.len(), 4);
	let values: Vec<_> = block.transactions.iter().skip(1).map(|tx| tx.outputs[0].value).collect();
	assert_eq!(values, vec![0, 200, 500]);
	assert!(contains(&block.transactions[1].inputs[0].script_sig, &PROCESS_ID_HASH[..]));
}

#[test]
fn test_missing_snapshot_keeps_worker_waiting() {
	let dir = tempfile::tempdir().unwrap();
	let chain_impl = Arc::new(Mutex::new(MemoryChain::with_height(Network::Unitest, 199)));
	let chain: ChainRef = chain_impl.clone();

	let options = MinerOptions {
		snapshot_dir: dir.path().to_path_buf(),
		..Default::default()
	};
	let mut miner = Miner::new(context(chain.clone(), options));
	miner.restart(true, 1);

	// the worker must sleep and retry, not exit and not mine
	thread::sleep(Duration::from_millis(2_500));
	assert!(miner.is_mining());
	assert_eq!(chain.lock().tip().height, 199);

	miner.shutdown();
	assert_eq!(chain_impl.lock().block_count(), 1);
}
