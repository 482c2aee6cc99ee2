use chain::constants::COIN;
use std::fmt;

/// Fee rate: satoshis per 1000 bytes of serialized transaction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FeeRate {
	satoshis_per_kilobyte: i64,
}

impl FeeRate {
	pub fn per_kilobyte(satoshis: i64) -> Self {
		FeeRate {
			satoshis_per_kilobyte: satoshis,
		}
	}

	pub fn from_fee_and_size(fee: i64, size: usize) -> Self {
		let satoshis_per_kilobyte = if size > 0 { fee * 1000 / size as i64 } else { 0 };
		FeeRate { satoshis_per_kilobyte }
	}

	pub fn fee_for_size(&self, size: usize) -> i64 {
		self.satoshis_per_kilobyte * size as i64 / 1000
	}
}

impl fmt::Display for FeeRate {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(
			f,
			"{}.{:08} ONX/kB",
			self.satoshis_per_kilobyte / COIN as i64,
			(self.satoshis_per_kilobyte % COIN as i64).abs()
		)
	}
}
