#[macro_use]
extern crate bitcoin_hashes;

pub use std::str::FromStr;

use bitcoin_hashes::hash160;
pub use bitcoin_hashes::hex::Error as HexError;
pub use bitcoin_hashes::hex::FromHex;
pub use bitcoin_hashes::Hash;
use bitcoin_hashes::sha256d;

pub mod equihash;

hash_newtype!(
	SHA256D,
	sha256d::Hash,
	32,
	doc = "SHA256D newtype wrapper of bitcoin_hashes::sha256d::Hash"
);

#[inline]
pub fn dhash256(input: &[u8]) -> SHA256D {
	SHA256D(sha256d::Hash::hash(input))
}

hash_newtype!(
	HASH160,
	hash160::Hash,
	20,
	doc = "HASH160 newtype wrapper of bitcoin_hashes::hash160::Hash"
);

#[inline]
pub fn dhash160(input: &[u8]) -> HASH160 {
	HASH160(hash160::Hash::hash(input))
}

/// A lot of tests use hashes in the form of already reversed hex strings. SHA256D from_str/from_hex impl reverses the
/// order and we don't want to do that if it's already reversed. This trait should only be used for this one hash type.
pub trait FromInnerHex {
	fn from_inner_hex(hex: &str) -> Result<SHA256D, HexError>;
}

impl FromInnerHex for SHA256D {
	fn from_inner_hex(hex: &str) -> Result<SHA256D, HexError> {
		Ok(SHA256D::from_inner(FromHex::from_hex(hex)?))
	}
}

#[cfg(test)]
mod tests {
	use super::{dhash160, dhash256, FromInnerHex, FromStr, HASH160, SHA256D};

	#[test]
	fn test_dhash160() {
		let expected = HASH160::from_str("b6a9c8c230722b7c748331a8b450f05566dc7d0f").unwrap();
		let result = dhash160(b"hello");
		assert_eq!(result, expected);
	}

	#[test]
	fn test_dhash256() {
		let expected = SHA256D::from_inner_hex("9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50").unwrap();
		let result = dhash256(b"hello");
		assert_eq!(result, expected);
	}
}
