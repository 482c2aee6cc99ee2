use onyxcrypto::{dhash256, SHA256D};
use primitives::bytes::Bytes;
use primitives::compact::Compact;
use primitives::hash::H256;
use ser::{serialize, Deserializable, Error as ReaderError, Reader, Serializable, Stream};
use std::{fmt, io};

/// Header of a block. The layout follows the Zcash lineage: a 256-bit
/// nonce, a variable-length Equihash solution and a reserved hash field
/// that carries the fork sentinel while the fork window is being mined.
#[derive(PartialEq, Clone)]
pub struct BlockHeader {
	pub version: u32,
	pub previous_header_hash: SHA256D,
	pub merkle_root_hash: SHA256D,
	pub reserved_hash: SHA256D,
	pub time: u32,
	pub bits: Compact,
	pub nonce: H256,
	pub solution: Bytes,
}

impl BlockHeader {
	pub fn hash(&self) -> SHA256D {
		block_header_hash(self)
	}

	/// Serialized prefix fed to the Equihash solver: every header field up
	/// to, but not including, the nonce and solution.
	pub fn equihash_input(&self) -> Bytes {
		let mut stream = Stream::default();
		stream
			.append(&self.version)
			.append(&self.previous_header_hash)
			.append(&self.merkle_root_hash)
			.append(&self.reserved_hash)
			.append(&self.time)
			.append(&self.bits);
		stream.out()
	}
}

impl fmt::Debug for BlockHeader {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("BlockHeader")
			.field("version", &self.version)
			.field("previous_header_hash", &self.previous_header_hash)
			.field("merkle_root_hash", &self.merkle_root_hash)
			.field("reserved_hash", &self.reserved_hash)
			.field("time", &self.time)
			.field("bits", &u32::from(self.bits))
			.field("nonce", &self.nonce)
			.field("solution", &self.solution)
			.finish()
	}
}

impl Serializable for BlockHeader {
	fn serialize(&self, stream: &mut Stream) {
		stream
			.append(&self.version)
			.append(&self.previous_header_hash)
			.append(&self.merkle_root_hash)
			.append(&self.reserved_hash)
			.append(&self.time)
			.append(&self.bits)
			.append(&self.nonce)
			.append(&self.solution);
	}
}

impl Deserializable for BlockHeader {
	fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, ReaderError>
	where
		T: io::Read,
	{
		Ok(BlockHeader {
			version: reader.read()?,
			previous_header_hash: reader.read()?,
			merkle_root_hash: reader.read()?,
			reserved_hash: reader.read()?,
			time: reader.read()?,
			bits: reader.read()?,
			nonce: reader.read()?,
			solution: reader.read()?,
		})
	}
}

/// The block hash covers the whole header, solution included.
pub fn block_header_hash(header: &BlockHeader) -> SHA256D {
	dhash256(&serialize(header))
}

#[cfg(test)]
mod tests {
	use super::BlockHeader;
	use primitives::hash::H256;
	use ser::{deserialize, serialize};

	fn sample_header() -> BlockHeader {
		BlockHeader {
			version: 4,
			previous_header_hash: Default::default(),
			merkle_root_hash: Default::default(),
			reserved_hash: Default::default(),
			time: 1_560_000_000,
			bits: 0x1d00ffff.into(),
			nonce: H256::from(7),
			solution: "0101".into(),
		}
	}

	#[test]
	fn test_block_header_round_trip() {
		let header = sample_header();
		let serialized = serialize(&header);
		// 4 + 32 + 32 + 32 + 4 + 4 + 32, one length byte, two solution bytes
		assert_eq!(serialized.len(), 143);
		assert_eq!(header, deserialize(&serialized[..]).unwrap());
	}

	#[test]
	fn test_equihash_input_excludes_nonce_and_solution() {
		let header = sample_header();
		let input = header.equihash_input();
		assert_eq!(input.len(), 108);
		assert_eq!(&serialize(&header)[..108], &input[..]);

		let mut other = header.clone();
		other.nonce = H256::from(8);
		other.solution = "02ff".into();
		assert_eq!(other.equihash_input(), input);
	}

	#[test]
	fn test_hash_depends_on_solution() {
		let header = sample_header();
		let mut other = header.clone();
		other.solution = "0202".into();
		assert!(header.hash() != other.hash());
	}
}
