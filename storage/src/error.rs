#[derive(Debug, PartialEq, Display)]
pub enum Error {
	/// Transaction inputs failed contextual checks
	#[display(fmt = "Invalid inputs: {}", _0)]
	InvalidInputs(String),
	/// Assembled block failed the validity preflight
	#[display(fmt = "Block validity check failed: {}", _0)]
	InvalidBlock(String),
	/// Solved block was not accepted by the node
	#[display(fmt = "Block rejected: {}", _0)]
	BlockRejected(String),
}

impl From<Error> for String {
	fn from(e: Error) -> String {
		format!("{}", e)
	}
}
