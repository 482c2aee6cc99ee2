use crate::opcode::Opcode;
use primitives::bytes::Bytes;
use std::{fmt, ops};

/// Maximum number of public keys per multisig.
pub const MAX_PUBKEYS_PER_MULTISIG: usize = 20;

/// One parsed script instruction: the opcode byte and the data it pushes.
#[derive(Debug, PartialEq)]
pub struct Instruction<'a> {
	pub opcode: u8,
	pub data: Option<&'a [u8]>,
}

/// Serialized script.
#[derive(PartialEq, Default, Clone)]
pub struct Script {
	data: Bytes,
}

impl fmt::Debug for Script {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.data.fmt(f)
	}
}

impl From<Bytes> for Script {
	fn from(data: Bytes) -> Self {
		Script { data }
	}
}

impl From<Vec<u8>> for Script {
	fn from(data: Vec<u8>) -> Self {
		Script { data: data.into() }
	}
}

impl From<Script> for Bytes {
	fn from(script: Script) -> Self {
		script.data
	}
}

impl From<&'static str> for Script {
	fn from(s: &'static str) -> Self {
		Script { data: s.into() }
	}
}

impl ops::Deref for Script {
	type Target = [u8];

	fn deref(&self) -> &Self::Target {
		&self.data
	}
}

impl Script {
	pub fn new(data: Bytes) -> Self {
		Script { data }
	}

	pub fn to_bytes(&self) -> Bytes {
		self.data.clone()
	}

	pub fn len(&self) -> usize {
		self.data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Parses the instruction starting at `position`. Returns the
	/// instruction and the position just past it, or `None` when the script
	/// is truncated mid-push.
	fn instruction_at(&self, position: usize) -> Option<(Instruction, usize)> {
		let opcode = *self.data.get(position)?;
		let (data_len, data_start) = match opcode {
			0x01..=0x4b => (opcode as usize, position + 1),
			opcode if opcode == Opcode::OP_PUSHDATA1 as u8 => {
				let len = *self.data.get(position + 1)? as usize;
				(len, position + 2)
			}
			opcode if opcode == Opcode::OP_PUSHDATA2 as u8 => {
				let low = *self.data.get(position + 1)? as usize;
				let high = *self.data.get(position + 2)? as usize;
				(low | (high << 8), position + 3)
			}
			opcode if opcode == Opcode::OP_PUSHDATA4 as u8 => {
				let mut len = 0usize;
				for i in 0..4 {
					len |= (*self.data.get(position + 1 + i)? as usize) << (8 * i);
				}
				(len, position + 5)
			}
			_ => {
				return Some((Instruction { opcode, data: None }, position + 1));
			}
		};

		let data_end = data_start.checked_add(data_len)?;
		if data_end > self.data.len() {
			return None;
		}

		Some((
			Instruction {
				opcode,
				data: Some(&self.data[data_start..data_end]),
			},
			data_end,
		))
	}

	/// Counts signature operations. With `accurate` set, multisig operations
	/// preceded by a small-integer push count as that many operations,
	/// otherwise as the maximum of twenty. Parsing stops quietly at a
	/// truncated push, counting what was seen, the way the reference
	/// implementation does.
	pub fn sigops_count(&self, accurate: bool) -> usize {
		let mut sigops = 0;
		let mut position = 0;
		let mut last_opcode = Opcode::OP_0 as u8;
		while let Some((instruction, next)) = self.instruction_at(position) {
			match instruction.opcode {
				opcode if opcode == Opcode::OP_CHECKSIG as u8 || opcode == Opcode::OP_CHECKSIGVERIFY as u8 => {
					sigops += 1;
				}
				opcode if opcode == Opcode::OP_CHECKMULTISIG as u8 || opcode == Opcode::OP_CHECKMULTISIGVERIFY as u8 => {
					sigops += match Opcode::decode_small_int(last_opcode) {
						Some(keys) if accurate => keys as usize,
						_ => MAX_PUBKEYS_PER_MULTISIG,
					};
				}
				_ => (),
			}
			last_opcode = instruction.opcode;
			position = next;
		}
		sigops
	}

	/// `OP_HASH160 <20 bytes> OP_EQUAL`
	pub fn is_pay_to_script_hash(&self) -> bool {
		self.data.len() == 23
			&& self.data[0] == Opcode::OP_HASH160 as u8
			&& self.data[1] == 0x14
			&& self.data[22] == Opcode::OP_EQUAL as u8
	}

	/// The data of the last push when every instruction is a push,
	/// `None` otherwise. This is how a P2SH spend carries its redeem script.
	pub fn last_push_if_only_pushes(&self) -> Option<&[u8]> {
		let mut position = 0;
		let mut last_data: Option<&[u8]> = None;
		while position < self.data.len() {
			let (instruction, next) = self.instruction_at(position)?;
			if !Opcode::is_push(instruction.opcode) {
				return None;
			}
			last_data = Some(instruction.data.unwrap_or(&[]));
			position = next;
		}
		last_data
	}

	/// Signature operations a P2SH input contributes: the accurate count
	/// over the redeem script carried by the spending script_sig.
	pub fn pay_to_script_hash_sigops(&self, script_sig: &Script) -> usize {
		if !self.is_pay_to_script_hash() {
			return 0;
		}
		match script_sig.last_push_if_only_pushes() {
			Some(redeem) => Script::from(redeem.to_vec()).sigops_count(true),
			None => 0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::Script;
	use crate::builder::Builder;
	use crate::opcode::Opcode;

	#[test]
	fn test_sigops_count() {
		// OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG
		let p2pkh: Script = "76a914000000000000000000000000000000000000000088ac".into();
		assert_eq!(p2pkh.sigops_count(false), 1);

		// OP_2 <33> <33> OP_2 OP_CHECKMULTISIG
		let multisig = Builder::new()
			.push_num(2u32)
			.push_data(&[0x02; 33])
			.push_data(&[0x03; 33])
			.push_num(2u32)
			.push_opcode(Opcode::OP_CHECKMULTISIG)
			.into_script();
		assert_eq!(multisig.sigops_count(true), 2);
		assert_eq!(multisig.sigops_count(false), 20);
	}

	#[test]
	fn test_sigops_count_truncated_push() {
		// push of 5 bytes with only 2 available
		let script: Script = vec![0x05, 0x01, 0x02].into();
		assert_eq!(script.sigops_count(false), 0);
	}

	#[test]
	fn test_is_pay_to_script_hash() {
		let p2sh: Script = "a914000000000000000000000000000000000000000087".into();
		assert!(p2sh.is_pay_to_script_hash());
		let p2pkh: Script = "76a914000000000000000000000000000000000000000088ac".into();
		assert!(!p2pkh.is_pay_to_script_hash());
	}

	#[test]
	fn test_pay_to_script_hash_sigops() {
		let redeem = Builder::new()
			.push_num(1u32)
			.push_data(&[0x02; 33])
			.push_num(1u32)
			.push_opcode(Opcode::OP_CHECKMULTISIG)
			.into_script();
		let script_sig = Builder::new().push_data(&redeem).into_script();
		let p2sh: Script = "a914000000000000000000000000000000000000000087".into();

		assert_eq!(p2sh.pay_to_script_hash_sigops(&script_sig), 1);
		// not p2sh - no sigops from the script_sig
		let p2pkh: Script = "76a914000000000000000000000000000000000000000088ac".into();
		assert_eq!(p2pkh.pay_to_script_hash_sigops(&script_sig), 0);
	}
}
