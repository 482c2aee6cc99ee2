//! Synthetic coinbases built from snapshot records during the fork window.

use crate::error::Error;
use crate::snapshot::SnapshotRecord;
use chain::constants::MAX_COINBASE_SCRIPT_SIG_SIZE;
use chain::{Transaction, TransactionInput, TransactionOutput};
use network::PROCESS_ID_HASH;
use primitives::bytes::Bytes;
use script::{Builder, Opcode};

/// Size of the placeholder script the dummy coinbase pays to.
const DUMMY_SCRIPT_SIZE: usize = 64;

/// `push(height) push(index) [push(hash_pid)] OP_0`. The process-identity
/// hash goes only into the first coinbase of a block.
fn fork_script_sig(height: u32, index: u64, with_pid: bool) -> Result<Bytes, Error> {
	let mut builder = Builder::new().push_num(height).push_num(index as i64);
	if with_pid {
		builder = builder.push_data(&PROCESS_ID_HASH[..]);
	}
	let script_sig = builder.push_opcode(Opcode::OP_0).into_bytes();
	if script_sig.len() > MAX_COINBASE_SCRIPT_SIG_SIZE {
		return Err(Error::OversizedScriptSig(script_sig.len()));
	}
	Ok(script_sig)
}

/// The placeholder element 0 of a fork-mode template.
pub fn dummy_fork_coinbase(height: u32) -> Result<Transaction, Error> {
	Ok(Transaction {
		version: 1,
		inputs: vec![TransactionInput::coinbase(fork_script_sig(height, 0, true)?)],
		outputs: vec![TransactionOutput {
			value: 0,
			script_pubkey: vec![0u8; DUMMY_SCRIPT_SIZE].into(),
		}],
		..Default::default()
	})
}

/// Builds the synthetic coinbase for one snapshot record.
///
/// Transparent records keep their script; any non-zero amount is doubled,
/// the fork's balance-inheritance premium. Shielded records are reshaped in
/// place: the transparent sides become coinbase-formed while the shielded
/// descriptors ride through untouched.
pub fn fork_coinbase(height: u32, index: u64, record: SnapshotRecord) -> Result<Transaction, Error> {
	let script_sig = fork_script_sig(height, index, index == 0)?;

	match record {
		SnapshotRecord::Transparent { amount, script_pubkey } => {
			let value = if amount == 0 { 0 } else { amount * 2 };
			Ok(Transaction {
				version: 1,
				inputs: vec![TransactionInput::coinbase(script_sig)],
				outputs: vec![TransactionOutput {
					value,
					script_pubkey,
				}],
				..Default::default()
			})
		}
		SnapshotRecord::Shielded(mut transaction) => {
			let script_pubkey = transaction
				.outputs
				.first()
				.map(|output| output.script_pubkey.clone())
				.unwrap_or_default();
			transaction.inputs = vec![TransactionInput::coinbase(script_sig)];
			transaction.outputs = vec![TransactionOutput {
				value: 0,
				script_pubkey,
			}];
			Ok(transaction)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{dummy_fork_coinbase, fork_coinbase};
	use crate::snapshot::SnapshotRecord;
	use chain::constants::JOIN_SPLIT_PAYLOAD_SIZE;
	use chain::{JoinSplit, Transaction, TransactionOutput};
	use network::PROCESS_ID_HASH;

	fn contains(haystack: &[u8], needle: &[u8]) -> bool {
		haystack.windows(needle.len()).any(|window| window == needle)
	}

	fn transparent(amount: u64) -> SnapshotRecord {
		SnapshotRecord::Transparent {
			amount,
			script_pubkey: vec![0x51].into(),
		}
	}

	#[test]
	fn test_doubling_rule() {
		let zero = fork_coinbase(200, 1, transparent(0)).unwrap();
		assert_eq!(zero.outputs[0].value, 0);

		let funded = fork_coinbase(200, 1, transparent(100)).unwrap();
		assert_eq!(funded.outputs[0].value, 200);
	}

	#[test]
	fn test_coinbase_shape() {
		let tx = fork_coinbase(200, 3, transparent(5)).unwrap();
		assert!(tx.is_coinbase());
		assert_eq!(tx.outputs.len(), 1);
		assert_eq!(&*tx.outputs[0].script_pubkey, &[0x51]);
	}

	#[test]
	fn test_hash_pid_only_in_first_coinbase() {
		let first = fork_coinbase(200, 0, transparent(1)).unwrap();
		assert!(contains(&first.inputs[0].script_sig, &PROCESS_ID_HASH[..]));

		let second = fork_coinbase(200, 1, transparent(1)).unwrap();
		assert!(!contains(&second.inputs[0].script_sig, &PROCESS_ID_HASH[..]));

		let dummy = dummy_fork_coinbase(200).unwrap();
		assert!(contains(&dummy.inputs[0].script_sig, &PROCESS_ID_HASH[..]));
		assert_eq!(dummy.outputs[0].value, 0);
	}

	#[test]
	fn test_shielded_record_reshaped_descriptors_kept() {
		let record = SnapshotRecord::Shielded(Transaction {
			version: 2,
			outputs: vec![
				TransactionOutput {
					value: 42,
					script_pubkey: vec![0x52].into(),
				},
				TransactionOutput {
					value: 43,
					script_pubkey: vec![0x53].into(),
				},
			],
			join_splits: vec![JoinSplit {
				vpub_old: 7,
				vpub_new: 9,
				payload: vec![0x5a; JOIN_SPLIT_PAYLOAD_SIZE].into(),
			}],
			..Default::default()
		});

		let tx = fork_coinbase(200, 0, record).unwrap();
		assert!(tx.is_coinbase());
		// single zero-value output, first script preserved
		assert_eq!(tx.outputs.len(), 1);
		assert_eq!(tx.outputs[0].value, 0);
		assert_eq!(&*tx.outputs[0].script_pubkey, &[0x52]);
		// shielded side untouched
		assert_eq!(tx.join_splits.len(), 1);
		assert_eq!(tx.join_splits[0].vpub_new, 9);
	}

	#[test]
	fn test_script_sig_within_consensus_limit() {
		// worst case: maximum height and index, pid included
		let record = transparent(1);
		let tx = fork_coinbase(u32::max_value(), u64::max_value() >> 8, record).unwrap();
		assert!(tx.inputs[0].script_sig.len() <= chain::constants::MAX_COINBASE_SCRIPT_SIG_SIZE);
	}
}
