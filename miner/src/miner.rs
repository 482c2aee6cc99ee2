//! Worker fleet supervision.

use crate::config::MinerOptions;
use crate::memory_pool::MemoryPool;
use crate::tip_notifier::TipNotifier;
use crate::wallet::Wallet;
use crate::worker::miner_worker;
use network::ConsensusParams;
use parking_lot::RwLock;
use primitives::time::Time;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use storage::ChainRef;

/// Reference to the shared memory pool.
pub type MemoryPoolRef = Arc<RwLock<MemoryPool>>;

/// What the mining loop observes about the network.
pub trait NetworkState: Send + Sync {
	/// Number of connected peers.
	fn peers_count(&self) -> usize;

	/// Initial block download still in progress.
	fn is_synchronizing(&self) -> bool;
}

/// Everything a mining worker consumes, shared across the fleet.
pub struct MinerContext {
	pub chain: ChainRef,
	pub mempool: MemoryPoolRef,
	pub network_state: Arc<dyn NetworkState>,
	pub consensus: ConsensusParams,
	pub options: MinerOptions,
	pub time: Arc<dyn Time + Send + Sync>,
	pub tip_notifier: Arc<TipNotifier>,
	pub wallet: Option<Arc<dyn Wallet>>,
}

/// Spawns and tears down the mining workers.
pub struct Miner {
	context: Arc<MinerContext>,
	threads: Vec<thread::JoinHandle<()>>,
	stop: Arc<AtomicBool>,
}

impl Miner {
	pub fn new(context: MinerContext) -> Self {
		Miner {
			context: Arc::new(context),
			threads: Vec::new(),
			stop: Arc::new(AtomicBool::new(false)),
		}
	}

	/// Reconfigures mining. Existing workers are always interrupted and
	/// joined first; a disabled miner or a zero thread count stops there.
	/// A negative count spawns one worker per core.
	pub fn restart(&mut self, generate: bool, threads: i32) {
		let threads = if threads < 0 { num_cpus::get() as i32 } else { threads };

		self.shutdown();

		if !generate || threads == 0 {
			return;
		}

		self.stop = Arc::new(AtomicBool::new(false));
		for index in 0..threads {
			let context = self.context.clone();
			let stop = self.stop.clone();
			self.threads.push(
				thread::Builder::new()
					.name(format!("miner.worker{}", index))
					.spawn(move || miner_worker(context, stop))
					.expect("error creating miner worker thread"),
			);
		}
	}

	/// Interrupts every worker and waits for them to unwind.
	pub fn shutdown(&mut self) {
		self.stop.store(true, Ordering::SeqCst);
		for handle in self.threads.drain(..) {
			let _ = handle.join();
		}
	}

	pub fn is_mining(&self) -> bool {
		!self.threads.is_empty()
	}

	pub fn context(&self) -> &Arc<MinerContext> {
		&self.context
	}
}

impl Drop for Miner {
	fn drop(&mut self) {
		self.shutdown();
	}
}
