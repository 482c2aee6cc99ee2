#[derive(Debug, PartialEq, Display)]
pub enum Error {
	/// The snapshot file for the target height is not available yet. Soft:
	/// the mining loop sleeps and retries.
	#[display(fmt = "UTXO snapshot for height {} is not available", _0)]
	SnapshotMissing(u32),
	/// The snapshot file ended mid-record or a record failed to decode.
	/// Body assembly stops; the partial template is still used.
	#[display(fmt = "UTXO snapshot corrupted: {}", _0)]
	SnapshotCorrupt(String),
	/// An assembled coinbase script_sig crossed the consensus limit. The
	/// transaction is skipped.
	#[display(fmt = "coinbase script_sig of {} bytes exceeds the consensus limit", _0)]
	OversizedScriptSig(usize),
	/// The node's validity preflight rejected the assembled template.
	#[display(fmt = "template invalid: {}", _0)]
	TemplateInvalid(String),
	/// The solved block no longer extends the active tip.
	#[display(fmt = "generated block is stale")]
	StaleBlock,
	/// The node did not accept the solved block.
	#[display(fmt = "block was not accepted: {}", _0)]
	BlockNotAccepted(String),
	/// No reserve key and no configured miner address. The worker exits;
	/// the operator has to refill the keypool or set an address.
	#[display(fmt = "keypool ran out, please refill it before restarting the mining thread")]
	KeypoolExhausted,
}

impl From<Error> for String {
	fn from(e: Error) -> String {
		format!("{}", e)
	}
}
