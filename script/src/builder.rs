use crate::num::ScriptNum;
use crate::opcode::Opcode;
use crate::script::Script;
use onyxcrypto::HASH160;
use primitives::bytes::Bytes;

/// Script builder.
#[derive(Default)]
pub struct Builder {
	data: Bytes,
}

impl Builder {
	pub fn new() -> Self {
		Builder::default()
	}

	pub fn push_opcode(mut self, opcode: Opcode) -> Self {
		self.data.push(opcode as u8);
		self
	}

	/// Pushes a number the way the reference client does: small values
	/// become dedicated opcodes, anything else a ScriptNum data push.
	pub fn push_num<N>(self, num: N) -> Self
	where
		N: Into<ScriptNum>,
	{
		let num = num.into();
		match num.value() {
			0 => self.push_opcode(Opcode::OP_0),
			-1 => self.push_opcode(Opcode::OP_1NEGATE),
			value @ 1..=16 => {
				let mut builder = self;
				builder.data.push(Opcode::OP_1 as u8 + value as u8 - 1);
				builder
			}
			_ => self.push_data(&num.serialize()),
		}
	}

	pub fn push_data(mut self, data: &[u8]) -> Self {
		match data.len() {
			len @ 0..=0x4b => {
				self.data.push(len as u8);
			}
			len @ 0x4c..=0xff => {
				self.data.push(Opcode::OP_PUSHDATA1 as u8);
				self.data.push(len as u8);
			}
			len @ 0x100..=0xffff => {
				self.data.push(Opcode::OP_PUSHDATA2 as u8);
				self.data.push((len & 0xff) as u8);
				self.data.push((len >> 8) as u8);
			}
			len => {
				self.data.push(Opcode::OP_PUSHDATA4 as u8);
				self.data.push((len & 0xff) as u8);
				self.data.push(((len >> 8) & 0xff) as u8);
				self.data.push(((len >> 16) & 0xff) as u8);
				self.data.push((len >> 24) as u8);
			}
		}
		self.data.extend_from_slice(data);
		self
	}

	pub fn into_script(self) -> Script {
		Script::new(self.data)
	}

	pub fn into_bytes(self) -> Bytes {
		self.data
	}

	/// Standard pay-to-public-key-hash output script.
	pub fn build_p2pkh(address_hash: &HASH160) -> Script {
		Builder::new()
			.push_opcode(Opcode::OP_DUP)
			.push_opcode(Opcode::OP_HASH160)
			.push_data(&address_hash[..])
			.push_opcode(Opcode::OP_EQUALVERIFY)
			.push_opcode(Opcode::OP_CHECKSIG)
			.into_script()
	}

	/// Standard pay-to-script-hash output script.
	pub fn build_p2sh(script_hash: &HASH160) -> Script {
		Builder::new()
			.push_opcode(Opcode::OP_HASH160)
			.push_data(&script_hash[..])
			.push_opcode(Opcode::OP_EQUAL)
			.into_script()
	}
}
