//! Reader for the per-height UTXO snapshot files that fork-mode mining
//! turns into synthetic coinbases.

use crate::error::Error;
use chain::constants::MAX_BLOCK_SIZE;
use chain::Transaction;
use primitives::bytes::Bytes;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Byte separating transparent records.
const RECORD_SEPARATOR: u8 = b'\n';

/// Size of the ASCII base-2 length field of a shielded record.
const SHIELDED_SIZE_FIELD: usize = 32;

/// Snapshot file for a fork-window height.
pub fn utxo_file_name(dir: &Path, height: u32) -> PathBuf {
	dir.join(format!("utxo-{:05}.bin", height))
}

/// Shielded-format variant, used only at the configured shielded start block.
pub fn shielded_utxo_file_name(dir: &Path, height: u32) -> PathBuf {
	dir.join(format!("zutxo-{:05}.bin", height))
}

/// One record of a snapshot file.
#[derive(Debug, PartialEq)]
pub enum SnapshotRecord {
	/// A transparent output inherited from the parent chain.
	Transparent { amount: u64, script_pubkey: Bytes },
	/// A pre-built shielded transaction, already decoded.
	Shielded(Transaction),
}

enum Format {
	Transparent {
		/// The file of the last fork-window height may run short of the
		/// per-block cap; everywhere else that is corruption.
		last_fork_height: bool,
	},
	Shielded,
}

/// Streams typed records out of one snapshot file. Restartable only by
/// reopening. A framing error poisons the reader: the record read so far is
/// still delivered, the next call reports the error.
pub struct SnapshotReader {
	file: BufReader<File>,
	format: Format,
	records: u64,
	cap: u64,
	pending_error: Option<Error>,
	finished: bool,
}

impl SnapshotReader {
	/// Opens the snapshot for `height`. A file that cannot be opened is
	/// `SnapshotMissing`, which the mining loop treats as "not ready yet".
	pub fn open(dir: &Path, height: u32, shielded: bool, last_fork_height: bool, cap: u64) -> Result<Self, Error> {
		let path = if shielded {
			shielded_utxo_file_name(dir, height)
		} else {
			utxo_file_name(dir, height)
		};
		trace!(target: "miner", "utxo file path: {}", path.display());

		let file = File::open(&path).map_err(|_| Error::SnapshotMissing(height))?;
		let format = if shielded {
			Format::Shielded
		} else {
			Format::Transparent { last_fork_height }
		};
		Ok(SnapshotReader {
			file: BufReader::new(file),
			format,
			records: 0,
			cap,
			pending_error: None,
			finished: false,
		})
	}

	/// Bytes actually read into `buffer`; io errors count as end of data.
	fn read_some(&mut self, buffer: &mut [u8]) -> usize {
		let mut filled = 0;
		while filled < buffer.len() {
			match self.file.read(&mut buffer[filled..]) {
				Ok(0) | Err(_) => break,
				Ok(n) => filled += n,
			}
		}
		filled
	}

	fn next_transparent(&mut self, last_fork_height: bool) -> Option<Result<SnapshotRecord, Error>> {
		let mut amount = [0u8; 8];
		match self.read_some(&mut amount) {
			8 => (),
			// only the last file of the window may run out of records
			_ if last_fork_height => return None,
			_ => return Some(Err(Error::SnapshotCorrupt("no more data (amount)".into()))),
		}
		let amount = u64::from_le_bytes(amount);

		let mut script_len = [0u8; 8];
		if self.read_some(&mut script_len) != 8 {
			return Some(Err(Error::SnapshotCorrupt("no more data (script length)".into())));
		}
		let script_len = u64::from_le_bytes(script_len);
		if script_len == 0 {
			// tolerated, an empty script is still a record
			error!(target: "miner", "utxo snapshot: script length = 0");
		}
		if script_len as usize > MAX_BLOCK_SIZE {
			return Some(Err(Error::SnapshotCorrupt("script length out of range".into())));
		}

		let mut script = vec![0u8; script_len as usize];
		if self.read_some(&mut script) != script.len() {
			return Some(Err(Error::SnapshotCorrupt("no more data (script)".into())));
		}

		// The separator trails the record. A bad or missing one fails the
		// reader only after the current record was delivered.
		let mut separator = [0u8; 1];
		if self.read_some(&mut separator) != 1 || separator[0] != RECORD_SEPARATOR {
			self.pending_error = Some(Error::SnapshotCorrupt("invalid record separator".into()));
		}

		Some(Ok(SnapshotRecord::Transparent {
			amount,
			script_pubkey: script.into(),
		}))
	}

	fn next_shielded(&mut self) -> Option<Result<SnapshotRecord, Error>> {
		let mut size_field = [0u8; SHIELDED_SIZE_FIELD];
		match self.read_some(&mut size_field) {
			0 => return None,
			n if n == SHIELDED_SIZE_FIELD => (),
			_ => return Some(Err(Error::SnapshotCorrupt("no more data (transaction size)".into()))),
		}

		// The length field holds the size in ASCII base-2 digits, padded
		// with arbitrary bytes. A zero size is a clean end of data.
		let digits = size_field.iter().take_while(|b| **b == b'0' || **b == b'1').count();
		let size = match u64::from_str_radix(&String::from_utf8_lossy(&size_field[..digits]), 2) {
			Ok(size) => size,
			Err(_) => 0,
		};
		if size == 0 {
			return None;
		}
		if size as usize > MAX_BLOCK_SIZE {
			return Some(Err(Error::SnapshotCorrupt("transaction size out of range".into())));
		}

		let mut transaction = vec![0u8; size as usize];
		if self.read_some(&mut transaction) != transaction.len() {
			return Some(Err(Error::SnapshotCorrupt("no more data (transaction)".into())));
		}

		match ser::deserialize::<_, Transaction>(&transaction[..]) {
			Ok(transaction) => Some(Ok(SnapshotRecord::Shielded(transaction))),
			Err(err) => Some(Err(Error::SnapshotCorrupt(format!("transaction decode: {}", err)))),
		}
	}
}

impl Iterator for SnapshotReader {
	type Item = Result<SnapshotRecord, Error>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.finished || self.records >= self.cap {
			return None;
		}
		if let Some(error) = self.pending_error.take() {
			self.finished = true;
			return Some(Err(error));
		}

		let record = match self.format {
			Format::Transparent { last_fork_height } => self.next_transparent(last_fork_height),
			Format::Shielded => self.next_shielded(),
		};

		match record {
			Some(Ok(record)) => {
				self.records += 1;
				Some(Ok(record))
			}
			Some(Err(error)) => {
				self.finished = true;
				Some(Err(error))
			}
			None => {
				self.finished = true;
				None
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{utxo_file_name, SnapshotReader, SnapshotRecord};
	use crate::error::Error;
	use chain::Transaction;
	use ser::serialize;
	use std::fs;
	use std::io::Write;
	use std::path::Path;

	fn write_snapshot(dir: &Path, height: u32, records: &[(u64, &[u8])]) {
		let mut data = Vec::new();
		for (amount, script) in records {
			data.extend_from_slice(&amount.to_le_bytes());
			data.extend_from_slice(&(script.len() as u64).to_le_bytes());
			data.extend_from_slice(script);
			data.push(b'\n');
		}
		fs::write(utxo_file_name(dir, height), data).unwrap();
	}

	fn open(dir: &Path, height: u32, last: bool, cap: u64) -> SnapshotReader {
		SnapshotReader::open(dir, height, false, last, cap).unwrap()
	}

	#[test]
	fn test_missing_file_is_soft() {
		let dir = tempfile::tempdir().unwrap();
		match SnapshotReader::open(dir.path(), 200, false, false, 10) {
			Err(Error::SnapshotMissing(200)) => (),
			other => panic!("expected SnapshotMissing, got {:?}", other.err()),
		}
	}

	#[test]
	fn test_transparent_records() {
		let dir = tempfile::tempdir().unwrap();
		write_snapshot(dir.path(), 200, &[(0, &[0x51]), (100, &[0x52, 0x53])]);

		let records: Vec<_> = open(dir.path(), 200, true, 10).collect::<Result<_, _>>().unwrap();
		assert_eq!(
			records,
			vec![
				SnapshotRecord::Transparent {
					amount: 0,
					script_pubkey: vec![0x51].into(),
				},
				SnapshotRecord::Transparent {
					amount: 100,
					script_pubkey: vec![0x52, 0x53].into(),
				},
			]
		);
	}

	#[test]
	fn test_record_cap() {
		let dir = tempfile::tempdir().unwrap();
		write_snapshot(dir.path(), 200, &[(1, &[0x51]), (2, &[0x51]), (3, &[0x51])]);

		let records: Vec<_> = open(dir.path(), 200, true, 2).collect::<Result<_, _>>().unwrap();
		assert_eq!(records.len(), 2);
	}

	#[test]
	fn test_short_file_is_clean_only_on_last_fork_height() {
		let dir = tempfile::tempdir().unwrap();
		write_snapshot(dir.path(), 209, &[(5, &[0x51])]);

		// cap of 10 not reached, but this is the window's last height
		let records: Vec<_> = open(dir.path(), 209, true, 10).collect();
		assert_eq!(records.len(), 1);
		assert!(records[0].is_ok());

		// same data mid-window: running out of records is corruption
		write_snapshot(dir.path(), 205, &[(5, &[0x51])]);
		let records: Vec<_> = open(dir.path(), 205, false, 10).collect();
		assert_eq!(records.len(), 2);
		assert!(records[0].is_ok());
		assert!(matches!(records[1], Err(Error::SnapshotCorrupt(_))));
	}

	#[test]
	fn test_truncated_record_is_corrupt() {
		let dir = tempfile::tempdir().unwrap();
		// amount promised but script cut short
		let mut data = Vec::new();
		data.extend_from_slice(&7u64.to_le_bytes());
		data.extend_from_slice(&5u64.to_le_bytes());
		data.extend_from_slice(&[0x51, 0x52]);
		fs::write(utxo_file_name(dir.path(), 205), data).unwrap();

		let records: Vec<_> = open(dir.path(), 205, true, 10).collect();
		assert_eq!(records.len(), 1);
		assert!(matches!(records[0], Err(Error::SnapshotCorrupt(_))));
	}

	#[test]
	fn test_bad_separator_delivers_record_then_fails() {
		let dir = tempfile::tempdir().unwrap();
		let mut data = Vec::new();
		data.extend_from_slice(&7u64.to_le_bytes());
		data.extend_from_slice(&1u64.to_le_bytes());
		data.push(0x51);
		data.push(b'x'); // wrong separator
		fs::write(utxo_file_name(dir.path(), 205), data).unwrap();

		let mut reader = open(dir.path(), 205, true, 10);
		assert!(matches!(reader.next(), Some(Ok(SnapshotRecord::Transparent { amount: 7, .. }))));
		assert!(matches!(reader.next(), Some(Err(Error::SnapshotCorrupt(_)))));
		assert!(reader.next().is_none());
	}

	#[test]
	fn test_shielded_records() {
		let dir = tempfile::tempdir().unwrap();
		let transaction = Transaction {
			version: 1,
			..Default::default()
		};
		let serialized = serialize(&transaction);

		let mut file = fs::File::create(super::shielded_utxo_file_name(dir.path(), 200)).unwrap();
		let mut size_field = format!("{:b}", serialized.len()).into_bytes();
		size_field.resize(32, 0);
		file.write_all(&size_field).unwrap();
		file.write_all(&serialized).unwrap();
		drop(file);

		let records: Vec<_> = SnapshotReader::open(dir.path(), 200, true, false, 10).unwrap().collect();
		assert_eq!(records.len(), 1);
		match &records[0] {
			Ok(SnapshotRecord::Shielded(restored)) => assert_eq!(*restored, transaction),
			other => panic!("unexpected record: {:?}", other),
		}
	}

	#[test]
	fn test_shielded_truncated_transaction_is_corrupt() {
		let dir = tempfile::tempdir().unwrap();
		let mut size_field = format!("{:b}", 100).into_bytes();
		size_field.resize(32, 0);
		let mut data = size_field;
		data.extend_from_slice(&[0u8; 10]);
		fs::write(super::shielded_utxo_file_name(dir.path(), 200), data).unwrap();

		let records: Vec<_> = SnapshotReader::open(dir.path(), 200, true, false, 10).unwrap().collect();
		assert_eq!(records.len(), 1);
		assert!(matches!(records[0], Err(Error::SnapshotCorrupt(_))));
	}

	#[test]
	fn test_shielded_zero_size_is_clean_end() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(super::shielded_utxo_file_name(dir.path(), 200), vec![0u8; 32]).unwrap();

		let mut reader = SnapshotReader::open(dir.path(), 200, true, false, 10).unwrap();
		assert!(reader.next().is_none());
	}
}
