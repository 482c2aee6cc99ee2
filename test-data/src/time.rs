use primitives::time::Time;
use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct IncrementalTime {
	counter: Cell<u64>,
}

impl Time for IncrementalTime {
	fn now(&self) -> Duration {
		let c = self.counter.get();
		let result = Duration::from_secs(c);
		self.counter.set(c + 1);
		result
	}
}

#[derive(Default)]
pub struct ZeroTime {}

impl Time for ZeroTime {
	fn now(&self) -> Duration {
		Duration::from_secs(0)
	}
}

/// A settable clock that can be shared across threads.
#[derive(Default)]
pub struct StaticTime {
	seconds: AtomicU64,
}

impl StaticTime {
	pub fn new(seconds: u64) -> Self {
		StaticTime {
			seconds: AtomicU64::new(seconds),
		}
	}

	pub fn set(&self, seconds: u64) {
		self.seconds.store(seconds, Ordering::SeqCst);
	}

	pub fn advance(&self, seconds: u64) {
		self.seconds.fetch_add(seconds, Ordering::SeqCst);
	}
}

impl Time for StaticTime {
	fn now(&self) -> Duration {
		Duration::from_secs(self.seconds.load(Ordering::SeqCst))
	}
}
