use chain::constants::SEQUENCE_FINAL;
use chain::{OutPoint, Transaction, TransactionInput, TransactionOutput};

/// Fluent builder for test transactions.
#[derive(Default)]
pub struct TransactionBuilder {
	transaction: Transaction,
}

impl TransactionBuilder {
	pub fn new() -> Self {
		TransactionBuilder {
			transaction: Transaction {
				version: 1,
				..Default::default()
			},
		}
	}

	pub fn add_input(mut self, previous_output: OutPoint) -> Self {
		self.transaction.inputs.push(TransactionInput {
			previous_output,
			script_sig: Default::default(),
			sequence: SEQUENCE_FINAL,
		});
		self
	}

	pub fn add_output(self, value: u64) -> Self {
		// OP_TRUE, the anyone-can-spend script
		self.add_output_with_script(value, vec![0x51])
	}

	pub fn add_output_with_script(mut self, value: u64, script: Vec<u8>) -> Self {
		self.transaction.outputs.push(TransactionOutput {
			value,
			script_pubkey: script.into(),
		});
		self
	}

	/// An output padded to inflate the serialized size, sigop-free.
	pub fn add_padded_output(self, value: u64, padding: usize) -> Self {
		self.add_output_with_script(value, vec![0x51; padding])
	}

	pub fn lock_time(mut self, lock_time: u32) -> Self {
		self.transaction.lock_time = lock_time;
		self
	}

	pub fn sequence(mut self, sequence: u32) -> Self {
		for input in &mut self.transaction.inputs {
			input.sequence = sequence;
		}
		self
	}

	pub fn build(self) -> Transaction {
		self.transaction
	}
}

#[cfg(test)]
mod tests {
	use super::TransactionBuilder;
	use chain::OutPoint;

	#[test]
	fn test_builder_produces_spendable_shape() {
		let tx = TransactionBuilder::new()
			.add_input(OutPoint {
				hash: Default::default(),
				index: 0,
			})
			.add_output(100)
			.build();
		assert_eq!(tx.inputs.len(), 1);
		assert_eq!(tx.outputs[0].value, 100);
		assert!(!tx.is_coinbase());
	}
}
