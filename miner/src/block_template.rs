use chain::Block;

/// A candidate block shaped for proof-of-work solving: a complete body and
/// a header lacking only a valid solution, plus the bookkeeping the mining
/// loop reports.
pub struct BlockTemplate {
	/// The block under construction. Element 0 of its transaction list is
	/// always the coinbase.
	pub block: Block,
	/// Per-transaction fees. Element 0 carries the negated fee total, so
	/// the sum over the whole list is zero.
	pub transaction_fees: Vec<i64>,
	/// Per-transaction signature operation counts. Element 0 is filled in
	/// last, once the real coinbase replaces the placeholder.
	pub transaction_sigops: Vec<i64>,
	/// Height this template is mined at.
	pub height: u32,
}

impl BlockTemplate {
	/// Serialized size of the body.
	pub fn size(&self) -> usize {
		self.block.size()
	}
}
