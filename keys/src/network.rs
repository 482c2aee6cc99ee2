/// Address network tag. Only the address version bytes differ between the
/// networks, so the miner config can reject addresses for the wrong chain.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Network {
	Mainnet,
	Testnet,
}

impl Default for Network {
	fn default() -> Self {
		Network::Mainnet
	}
}

#[cfg(test)]
mod tests {
	use super::Network;

	#[test]
	fn test_default_network() {
		assert_eq!(Network::default(), Network::Mainnet);
	}
}
