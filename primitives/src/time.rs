use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub trait Time {
	// The duration since the UNIX epoch.
	fn now(&self) -> Duration;

	// Seconds since the UNIX epoch, truncated to header precision.
	fn now_secs(&self) -> u32 {
		self.now().as_secs() as u32
	}
}

#[derive(Default, Debug)]
pub struct RealTime;

impl Time for RealTime {
	fn now(&self) -> Duration {
		SystemTime::now().duration_since(UNIX_EPOCH).unwrap()
	}
}
