use crate::transaction::Transaction;
use onyxcrypto::SHA256D;
use std::{cmp, fmt};

#[derive(Default, Clone)]
pub struct IndexedTransaction {
	pub hash: SHA256D,
	pub raw: Transaction,
}

impl fmt::Debug for IndexedTransaction {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("IndexedTransaction")
			.field("hash", &self.hash)
			.field("raw", &self.raw)
			.finish()
	}
}

impl IndexedTransaction {
	pub fn new(hash: SHA256D, transaction: Transaction) -> Self {
		IndexedTransaction { hash, raw: transaction }
	}
}

impl From<Transaction> for IndexedTransaction {
	fn from(transaction: Transaction) -> Self {
		IndexedTransaction {
			hash: transaction.hash(),
			raw: transaction,
		}
	}
}

impl cmp::PartialEq for IndexedTransaction {
	fn eq(&self, other: &Self) -> bool {
		self.hash == other.hash
	}
}

#[cfg(test)]
mod tests {
	use super::IndexedTransaction;
	use crate::transaction::Transaction;

	#[test]
	fn test_hash_is_cached_on_conversion() {
		let transaction = Transaction::default();
		let indexed: IndexedTransaction = transaction.clone().into();
		assert_eq!(indexed.hash, transaction.hash());
	}
}
