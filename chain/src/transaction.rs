use crate::constants::{JOIN_SPLIT_PAYLOAD_SIZE, JOIN_SPLIT_SIG_SIZE, LOCKTIME_THRESHOLD, SEQUENCE_FINAL};
use onyxcrypto::{dhash256, SHA256D};
use primitives::bytes::Bytes;
use primitives::hash::H256;
use ser::{serialize, Deserializable, Error as ReaderError, Reader, Serializable, Stream};
use std::cmp::min;
use std::io;

/// First transaction version with shielded transfer support.
pub const SHIELDED_TX_VERSION: i32 = 2;

#[derive(Debug, PartialEq, Eq, Clone, Default, Hash)]
pub struct OutPoint {
	pub hash: SHA256D,
	pub index: u32,
}

impl OutPoint {
	pub fn null() -> Self {
		OutPoint {
			hash: Default::default(),
			index: u32::max_value(),
		}
	}

	pub fn is_null(&self) -> bool {
		self.hash == Default::default() && self.index == u32::max_value()
	}
}

impl Serializable for OutPoint {
	fn serialize(&self, stream: &mut Stream) {
		stream.append(&self.hash).append(&self.index);
	}

	fn serialized_size(&self) -> usize {
		36
	}
}

impl Deserializable for OutPoint {
	fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, ReaderError>
	where
		T: io::Read,
	{
		Ok(OutPoint {
			hash: reader.read()?,
			index: reader.read()?,
		})
	}
}

#[derive(Debug, PartialEq, Default, Clone)]
pub struct TransactionInput {
	pub previous_output: OutPoint,
	pub script_sig: Bytes,
	pub sequence: u32,
}

impl TransactionInput {
	pub fn coinbase(script_sig: Bytes) -> Self {
		TransactionInput {
			previous_output: OutPoint::null(),
			script_sig,
			sequence: SEQUENCE_FINAL,
		}
	}

	pub fn is_final(&self) -> bool {
		self.sequence == SEQUENCE_FINAL
	}
}

impl Serializable for TransactionInput {
	fn serialize(&self, stream: &mut Stream) {
		stream.append(&self.previous_output).append(&self.script_sig).append(&self.sequence);
	}
}

impl Deserializable for TransactionInput {
	fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, ReaderError>
	where
		T: io::Read,
	{
		Ok(TransactionInput {
			previous_output: reader.read()?,
			script_sig: reader.read()?,
			sequence: reader.read()?,
		})
	}
}

#[derive(Debug, PartialEq, Default, Clone)]
pub struct TransactionOutput {
	pub value: u64,
	pub script_pubkey: Bytes,
}

impl Serializable for TransactionOutput {
	fn serialize(&self, stream: &mut Stream) {
		stream.append(&self.value).append(&self.script_pubkey);
	}
}

impl Deserializable for TransactionOutput {
	fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, ReaderError>
	where
		T: io::Read,
	{
		Ok(TransactionOutput {
			value: reader.read()?,
			script_pubkey: reader.read()?,
		})
	}
}

/// Shielded transfer descriptor. The two value-pool amounts take part in
/// fee and priority accounting; the rest of the descriptor (anchor,
/// nullifiers, commitments, proof, ciphertexts) is opaque to this node and
/// is carried through byte-identically.
#[derive(Debug, PartialEq, Clone)]
pub struct JoinSplit {
	/// Value leaving the transparent pool.
	pub vpub_old: u64,
	/// Value entering the transparent pool.
	pub vpub_new: u64,
	/// Opaque remainder of the descriptor, fixed size.
	pub payload: Bytes,
}

impl Serializable for JoinSplit {
	fn serialize(&self, stream: &mut Stream) {
		stream.append(&self.vpub_old).append(&self.vpub_new).append_slice(&self.payload);
	}

	fn serialized_size(&self) -> usize {
		16 + JOIN_SPLIT_PAYLOAD_SIZE
	}
}

impl Deserializable for JoinSplit {
	fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, ReaderError>
	where
		T: io::Read,
	{
		let vpub_old = reader.read()?;
		let vpub_new = reader.read()?;
		let mut payload = Bytes::new_with_len(JOIN_SPLIT_PAYLOAD_SIZE);
		reader.read_slice(&mut payload)?;
		Ok(JoinSplit {
			vpub_old,
			vpub_new,
			payload,
		})
	}
}

#[derive(Debug, PartialEq, Default, Clone)]
pub struct Transaction {
	pub version: i32,
	pub inputs: Vec<TransactionInput>,
	pub outputs: Vec<TransactionOutput>,
	pub lock_time: u32,
	pub join_splits: Vec<JoinSplit>,
	pub join_split_pubkey: H256,
	pub join_split_sig: Bytes,
}

impl Transaction {
	pub fn hash(&self) -> SHA256D {
		dhash256(&serialize(self))
	}

	pub fn is_coinbase(&self) -> bool {
		self.inputs.len() == 1 && self.inputs[0].previous_output.is_null()
	}

	pub fn is_empty(&self) -> bool {
		self.inputs.is_empty() || self.outputs.is_empty()
	}

	/// Finality under the given height and lock-time cutoff.
	pub fn is_final_in_block(&self, block_height: u32, block_time: u32) -> bool {
		if self.lock_time == 0 {
			return true;
		}

		let cutoff = if self.lock_time < LOCKTIME_THRESHOLD {
			block_height
		} else {
			block_time
		};
		if self.lock_time < cutoff {
			return true;
		}

		self.inputs.iter().all(TransactionInput::is_final)
	}

	/// Value this transaction spends: transparent outputs plus value moved
	/// out of the transparent pool by shielded transfers.
	pub fn total_spends(&self) -> u64 {
		self.outputs.iter().map(|output| output.value).sum::<u64>() + self.join_splits.iter().map(|js| js.vpub_old).sum::<u64>()
	}

	/// Value shielded transfers contribute to the transparent pool.
	pub fn join_split_value_in(&self) -> u64 {
		self.join_splits.iter().map(|js| js.vpub_new).sum()
	}

	/// Serialized size with a discount per input, used as the denominator of
	/// the priority formula.
	pub fn modified_size(&self) -> usize {
		let mut size = self.serialized_size();
		for input in &self.inputs {
			let offset = 41 + min(110, input.script_sig.len());
			if size > offset {
				size -= offset;
			}
		}
		size
	}

	/// Priority is sum(input_value * input_age) / modified_size.
	pub fn compute_priority(&self, input_priority: f64) -> f64 {
		match self.modified_size() {
			0 => 0.0,
			size => input_priority / size as f64,
		}
	}

	pub fn serialized_size(&self) -> usize {
		Serializable::serialized_size(self)
	}
}

impl Serializable for Transaction {
	fn serialize(&self, stream: &mut Stream) {
		stream
			.append(&self.version)
			.append_list(&self.inputs)
			.append_list(&self.outputs)
			.append(&self.lock_time);
		if self.version >= SHIELDED_TX_VERSION {
			stream.append_list(&self.join_splits);
			if !self.join_splits.is_empty() {
				stream.append(&self.join_split_pubkey).append_slice(&self.join_split_sig);
			}
		}
	}
}

impl Deserializable for Transaction {
	fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, ReaderError>
	where
		T: io::Read,
	{
		let version: i32 = reader.read()?;
		let inputs = reader.read_list()?;
		let outputs = reader.read_list()?;
		let lock_time = reader.read()?;
		let mut join_splits = Vec::new();
		let mut join_split_pubkey = H256::default();
		let mut join_split_sig = Bytes::new();
		if version >= SHIELDED_TX_VERSION {
			join_splits = reader.read_list()?;
			if !join_splits.is_empty() {
				join_split_pubkey = reader.read()?;
				join_split_sig = Bytes::new_with_len(JOIN_SPLIT_SIG_SIZE);
				reader.read_slice(&mut join_split_sig)?;
			}
		}

		Ok(Transaction {
			version,
			inputs,
			outputs,
			lock_time,
			join_splits,
			join_split_pubkey,
			join_split_sig,
		})
	}
}

impl From<&'static str> for Transaction {
	fn from(s: &'static str) -> Self {
		let bytes: Bytes = s.into();
		ser::deserialize(&bytes[..]).unwrap()
	}
}
