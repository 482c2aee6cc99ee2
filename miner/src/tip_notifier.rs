//! Fan-out of tip-change notifications to per-worker cancel flags.

use onyxcrypto::SHA256D;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// The node raises `notify` whenever the active tip changes; every
/// connected worker's cancel flag goes up so in-flight solver runs stop
/// wasting work on a stale template.
#[derive(Default)]
pub struct TipNotifier {
	connections: Mutex<Vec<(u64, Arc<AtomicBool>)>>,
	next_id: AtomicU64,
}

impl TipNotifier {
	pub fn new() -> Self {
		TipNotifier::default()
	}

	pub fn connect(self: &Arc<Self>) -> TipConnection {
		let id = self.next_id.fetch_add(1, Ordering::SeqCst);
		let flag = Arc::new(AtomicBool::new(false));
		self.connections.lock().push((id, flag.clone()));
		TipConnection {
			id,
			flag,
			notifier: self.clone(),
		}
	}

	pub fn notify(&self, tip: &SHA256D) {
		trace!(target: "miner", "tip changed to {}, cancelling solvers", tip);
		for (_, flag) in self.connections.lock().iter() {
			flag.store(true, Ordering::SeqCst);
		}
	}

	fn disconnect(&self, id: u64) {
		self.connections.lock().retain(|(connection_id, _)| *connection_id != id);
	}
}

/// One worker's subscription. Dropped on worker exit.
pub struct TipConnection {
	id: u64,
	flag: Arc<AtomicBool>,
	notifier: Arc<TipNotifier>,
}

impl TipConnection {
	/// Has the tip changed since the last `reset`?
	pub fn cancelled(&self) -> bool {
		self.flag.load(Ordering::SeqCst)
	}

	/// Rearm after handling a cancellation, or after submitting our own
	/// block so the resulting tip update is not treated as foreign.
	pub fn reset(&self) {
		self.flag.store(false, Ordering::SeqCst);
	}
}

impl Drop for TipConnection {
	fn drop(&mut self) {
		self.notifier.disconnect(self.id);
	}
}
