use chain::{OutPoint, Transaction, TransactionOutput};
use std::collections::{HashMap, HashSet};

/// An unspent transparent output together with the context transaction
/// selection needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Coin {
	pub output: TransactionOutput,
	/// Height of the block the output was created in.
	pub height: u32,
	pub is_coinbase: bool,
}

/// Read access to the unspent output set.
pub trait CoinsView {
	fn coin(&self, outpoint: &OutPoint) -> Option<Coin>;
}

/// Overlay over a base view. Transactions already placed into the template
/// under construction are applied here so later candidates spend their
/// outputs and cannot double-spend their inputs.
pub struct CoinsViewCache<'a> {
	base: &'a dyn CoinsView,
	added: HashMap<OutPoint, Coin>,
	spent: HashSet<OutPoint>,
}

impl<'a> CoinsViewCache<'a> {
	pub fn new(base: &'a dyn CoinsView) -> Self {
		CoinsViewCache {
			base,
			added: HashMap::new(),
			spent: HashSet::new(),
		}
	}

	pub fn coin(&self, outpoint: &OutPoint) -> Option<Coin> {
		if self.spent.contains(outpoint) {
			return None;
		}
		if let Some(coin) = self.added.get(outpoint) {
			return Some(coin.clone());
		}
		self.base.coin(outpoint)
	}

	pub fn have_coin(&self, outpoint: &OutPoint) -> bool {
		self.coin(outpoint).is_some()
	}

	pub fn have_inputs(&self, transaction: &Transaction) -> bool {
		transaction.inputs.iter().all(|input| self.have_coin(&input.previous_output))
	}

	/// Value flowing into the transaction: transparent inputs plus the
	/// shielded value entering the transparent pool.
	pub fn value_in(&self, transaction: &Transaction) -> u64 {
		let transparent: u64 = transaction
			.inputs
			.iter()
			.filter_map(|input| self.coin(&input.previous_output))
			.map(|coin| coin.output.value)
			.sum();
		transparent + transaction.join_split_value_in()
	}

	/// Applies the transaction to the overlay: spends its inputs, exposes
	/// its outputs at the given height.
	pub fn apply_transaction(&mut self, transaction: &Transaction, height: u32) {
		let hash = transaction.hash();
		for input in &transaction.inputs {
			self.spent.insert(input.previous_output.clone());
		}
		for (index, output) in transaction.outputs.iter().enumerate() {
			self.added.insert(
				OutPoint {
					hash,
					index: index as u32,
				},
				Coin {
					output: output.clone(),
					height,
					is_coinbase: transaction.is_coinbase(),
				},
			);
		}
	}
}
