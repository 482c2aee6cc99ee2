//! Fixed-size byte arrays that are not hashes of anything: the 256-bit
//! header nonce lives here.

use crate::U256;
use hex::{FromHex, FromHexError, ToHex};
use std::{cmp, fmt, ops, str};

/// 32 bytes of plain data, little-endian when interpreted as a number.
#[derive(Default, Clone, Copy)]
pub struct H256([u8; 32]);

impl H256 {
	pub fn new() -> Self {
		H256::default()
	}

	pub fn size() -> usize {
		32
	}

	pub fn is_zero(&self) -> bool {
		self.0.iter().all(|b| *b == 0)
	}
}

impl From<[u8; 32]> for H256 {
	fn from(h: [u8; 32]) -> Self {
		H256(h)
	}
}

impl From<H256> for [u8; 32] {
	fn from(h: H256) -> Self {
		h.0
	}
}

impl From<u8> for H256 {
	fn from(v: u8) -> Self {
		let mut result = H256::default();
		result.0[0] = v;
		result
	}
}

impl From<U256> for H256 {
	fn from(u: U256) -> Self {
		let mut result = H256::default();
		u.to_little_endian(&mut result.0);
		result
	}
}

impl From<H256> for U256 {
	fn from(h: H256) -> Self {
		U256::from_little_endian(&h.0)
	}
}

impl str::FromStr for H256 {
	type Err = FromHexError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let vec: Vec<u8> = s.from_hex()?;
		match vec.len() {
			32 => {
				let mut result = [0u8; 32];
				result.copy_from_slice(&vec);
				Ok(H256(result))
			}
			_ => Err(FromHexError::InvalidHexLength),
		}
	}
}

impl From<&'static str> for H256 {
	fn from(s: &'static str) -> Self {
		s.parse().unwrap()
	}
}

impl fmt::Debug for H256 {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.0.to_hex::<String>())
	}
}

impl fmt::Display for H256 {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.0.to_hex::<String>())
	}
}

impl ops::Deref for H256 {
	type Target = [u8; 32];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl ops::DerefMut for H256 {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.0
	}
}

impl AsRef<[u8]> for H256 {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

impl cmp::PartialEq for H256 {
	fn eq(&self, other: &Self) -> bool {
		self.0[..] == other.0[..]
	}
}

impl cmp::Eq for H256 {}

impl std::hash::Hash for H256 {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		state.write(&self.0);
	}
}

#[cfg(test)]
mod tests {
	use super::H256;
	use crate::U256;

	#[test]
	fn test_u256_round_trip() {
		let h: H256 = U256::from(0x1234_5678u64).into();
		assert_eq!(h[0], 0x78);
		assert_eq!(U256::from(h), U256::from(0x1234_5678u64));
	}

	#[test]
	fn test_from_str() {
		let h: H256 = "ff00000000000000000000000000000000000000000000000000000000000000".into();
		assert_eq!(U256::from(h), U256::from(0xffu64));
	}
}
