use crate::block_header::BlockHeader;
use crate::merkle_root::merkle_root;
use crate::transaction::Transaction;
use onyxcrypto::SHA256D;
use ser::{serialize, Deserializable, Error as ReaderError, Reader, Serializable, Stream};
use std::io;

#[derive(Debug, PartialEq, Clone)]
pub struct Block {
	pub block_header: BlockHeader,
	pub transactions: Vec<Transaction>,
}

impl Block {
	pub fn new(header: BlockHeader, transactions: Vec<Transaction>) -> Self {
		Block {
			block_header: header,
			transactions,
		}
	}

	/// Returns block's merkle root computed over the transaction list.
	pub fn merkle_root(&self) -> SHA256D {
		let hashes = self.transactions.iter().map(Transaction::hash).collect::<Vec<SHA256D>>();
		merkle_root(&hashes)
	}

	pub fn transactions(&self) -> &[Transaction] {
		&self.transactions
	}

	pub fn header(&self) -> &BlockHeader {
		&self.block_header
	}

	pub fn hash(&self) -> SHA256D {
		self.block_header.hash()
	}

	pub fn size(&self) -> usize {
		serialize(self).len()
	}
}

impl Serializable for Block {
	fn serialize(&self, stream: &mut Stream) {
		stream.append(&self.block_header).append_list(&self.transactions);
	}
}

impl Deserializable for Block {
	fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, ReaderError>
	where
		T: io::Read,
	{
		Ok(Block {
			block_header: reader.read()?,
			transactions: reader.read_list()?,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::Block;
	use crate::block_header::BlockHeader;
	use crate::transaction::{Transaction, TransactionInput, TransactionOutput};
	use ser::{deserialize, serialize};

	fn sample_block() -> Block {
		let coinbase = Transaction {
			version: 1,
			inputs: vec![TransactionInput::coinbase("510101".into())],
			outputs: vec![TransactionOutput {
				value: 50,
				script_pubkey: "51".into(),
			}],
			lock_time: 0,
			..Default::default()
		};
		let header = BlockHeader {
			version: 4,
			previous_header_hash: Default::default(),
			merkle_root_hash: Default::default(),
			reserved_hash: Default::default(),
			time: 1_560_000_000,
			bits: 0x207fffff.into(),
			nonce: Default::default(),
			solution: Default::default(),
		};
		Block::new(header, vec![coinbase])
	}

	#[test]
	fn test_block_round_trip() {
		let block = sample_block();
		assert_eq!(block, deserialize(&serialize(&block)[..]).unwrap());
	}

	#[test]
	fn test_merkle_root_of_single_transaction() {
		let block = sample_block();
		assert_eq!(block.merkle_root(), block.transactions[0].hash());
	}
}
