use chain::{IndexedTransaction, OutPoint, TransactionOutput};
use onyxcrypto::SHA256D;
use std::collections::HashMap;

/// A verified transaction waiting for a block.
#[derive(Debug, Clone)]
pub struct MemoryPoolEntry {
	pub transaction: IndexedTransaction,
	/// Unix time the transaction entered the pool.
	pub time: u32,
	/// Fee measured when the transaction was accepted.
	pub fee: u64,
}

/// Admin adjustments applied on top of measured priority and fee. Both
/// sides are signed: a negative delta deprioritizes a transaction.
#[derive(Debug, Default, Clone, Copy)]
struct Deltas {
	priority: f64,
	fee: i64,
}

/// Read-only snapshot of the pool shape.
#[derive(Debug, Default, PartialEq)]
pub struct Information {
	pub transactions_count: usize,
	pub transactions_size_in_bytes: usize,
}

/// The pending-transaction pool, reduced to what block assembly consumes:
/// entry iteration, in-pool output lookup, admin deltas, and a monotonic
/// change counter the mining loop watches.
#[derive(Default)]
pub struct MemoryPool {
	entries: HashMap<SHA256D, MemoryPoolEntry>,
	deltas: HashMap<SHA256D, Deltas>,
	transactions_updated: u32,
	transactions_size_in_bytes: usize,
}

impl MemoryPool {
	pub fn new() -> Self {
		MemoryPool::default()
	}

	pub fn insert_verified(&mut self, transaction: IndexedTransaction, fee: u64, time: u32) {
		self.transactions_size_in_bytes += transaction.raw.serialized_size();
		self.entries.insert(
			transaction.hash,
			MemoryPoolEntry {
				transaction,
				time,
				fee,
			},
		);
		self.transactions_updated += 1;
	}

	pub fn remove(&mut self, hash: &SHA256D) -> Option<MemoryPoolEntry> {
		let entry = self.entries.remove(hash)?;
		self.transactions_size_in_bytes -= entry.transaction.raw.serialized_size();
		self.transactions_updated += 1;
		Some(entry)
	}

	pub fn contains(&self, hash: &SHA256D) -> bool {
		self.entries.contains_key(hash)
	}

	pub fn get(&self, hash: &SHA256D) -> Option<&MemoryPoolEntry> {
		self.entries.get(hash)
	}

	/// Output of a transaction still waiting in the pool. Selection uses
	/// this to price children of not-yet-mined parents.
	pub fn transaction_output(&self, outpoint: &OutPoint) -> Option<&TransactionOutput> {
		self.entries
			.get(&outpoint.hash)
			.and_then(|entry| entry.transaction.raw.outputs.get(outpoint.index as usize))
	}

	/// `prioritisetransaction`: biases selection for the given transaction.
	pub fn prioritise_transaction(&mut self, hash: SHA256D, priority_delta: f64, fee_delta: i64) {
		let deltas = self.deltas.entry(hash).or_default();
		deltas.priority += priority_delta;
		deltas.fee = deltas.fee.saturating_add(fee_delta);
	}

	/// The accumulated admin deltas for a transaction.
	pub fn deltas(&self, hash: &SHA256D) -> (f64, i64) {
		match self.deltas.get(hash) {
			Some(deltas) => (deltas.priority, deltas.fee),
			None => (0.0, 0),
		}
	}

	/// Bumped on every insert and removal. The mining loop compares
	/// snapshots of this counter to decide whether a template went stale.
	pub fn transactions_updated(&self) -> u32 {
		self.transactions_updated
	}

	pub fn iter(&self) -> impl Iterator<Item = (&SHA256D, &MemoryPoolEntry)> {
		self.entries.iter()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn information(&self) -> Information {
		Information {
			transactions_count: self.entries.len(),
			transactions_size_in_bytes: self.transactions_size_in_bytes,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::MemoryPool;
	use chain::{OutPoint, Transaction, TransactionOutput};

	fn transaction_with_output(value: u64) -> Transaction {
		Transaction {
			version: 1,
			outputs: vec![TransactionOutput {
				value,
				script_pubkey: Default::default(),
			}],
			..Default::default()
		}
	}

	#[test]
	fn test_insert_remove_updates_counter() {
		let mut pool = MemoryPool::new();
		assert_eq!(pool.transactions_updated(), 0);

		let tx = transaction_with_output(10);
		let hash = tx.hash();
		pool.insert_verified(tx.into(), 1000, 0);
		assert_eq!(pool.transactions_updated(), 1);
		assert!(pool.contains(&hash));
		assert_eq!(pool.information().transactions_count, 1);

		pool.remove(&hash);
		assert_eq!(pool.transactions_updated(), 2);
		assert!(pool.is_empty());
		assert_eq!(pool.information().transactions_size_in_bytes, 0);
	}

	#[test]
	fn test_transaction_output_lookup() {
		let mut pool = MemoryPool::new();
		let tx = transaction_with_output(77);
		let hash = tx.hash();
		pool.insert_verified(tx.into(), 0, 0);

		let output = pool.transaction_output(&OutPoint { hash, index: 0 });
		assert_eq!(output.map(|o| o.value), Some(77));
		assert!(pool.transaction_output(&OutPoint { hash, index: 1 }).is_none());
	}

	#[test]
	fn test_prioritise_transaction_accumulates() {
		let mut pool = MemoryPool::new();
		let hash = transaction_with_output(1).hash();
		pool.prioritise_transaction(hash, 100.0, 50);
		pool.prioritise_transaction(hash, 10.0, 5);
		assert_eq!(pool.deltas(&hash), (110.0, 55));

		// deltas can push the other way too
		pool.prioritise_transaction(hash, -200.0, -100);
		assert_eq!(pool.deltas(&hash), (-90.0, -45));
	}
}
