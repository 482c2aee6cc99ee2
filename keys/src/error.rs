#[derive(Debug, PartialEq, Display)]
pub enum Error {
	/// Address checksum does not match its payload
	#[display(fmt = "Invalid checksum")]
	InvalidChecksum,
	/// Address is not valid base58check
	#[display(fmt = "Invalid address")]
	InvalidAddress,
	/// Address version byte is unknown
	#[display(fmt = "Invalid version")]
	InvalidVersion,
}

impl From<Error> for String {
	fn from(e: Error) -> String {
		format!("{}", e)
	}
}
