//! Base58check addresses.
//!
//! The miner only ever converts an address into an output script, so key
//! derivation and signing live outside this crate.

use crate::display::DisplayLayout;
use crate::network::Network;
use crate::{AddressHash, Error};
use base58::{FromBase58, ToBase58};
use onyxcrypto::{dhash256, Hash};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// Type of the destination the address encodes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Type {
	/// Pay to public key hash
	P2PKH,
	/// Pay to script hash
	P2SH,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Address {
	pub kind: Type,
	pub network: Network,
	pub hash: AddressHash,
}

pub struct AddressDisplayLayout([u8; 25]);

impl Deref for AddressDisplayLayout {
	type Target = [u8];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

fn address_version(network: Network, kind: Type) -> u8 {
	match (network, kind) {
		(Network::Mainnet, Type::P2PKH) => 0,
		(Network::Mainnet, Type::P2SH) => 5,
		(Network::Testnet, Type::P2PKH) => 111,
		(Network::Testnet, Type::P2SH) => 196,
	}
}

impl DisplayLayout for Address {
	type Target = AddressDisplayLayout;

	fn layout(&self) -> Self::Target {
		let mut result = [0u8; 25];
		result[0] = address_version(self.network, self.kind);
		result[1..21].copy_from_slice(&self.hash[..]);
		let cs = dhash256(&result[0..21]);
		result[21..25].copy_from_slice(&cs[0..4]);
		AddressDisplayLayout(result)
	}

	fn from_layout(data: &[u8]) -> Result<Self, Error> {
		if data.len() != 25 {
			return Err(Error::InvalidAddress);
		}

		let cs = dhash256(&data[0..21]);
		if data[21..25] != cs[0..4] {
			return Err(Error::InvalidChecksum);
		}

		let (network, kind) = match data[0] {
			0 => (Network::Mainnet, Type::P2PKH),
			5 => (Network::Mainnet, Type::P2SH),
			111 => (Network::Testnet, Type::P2PKH),
			196 => (Network::Testnet, Type::P2SH),
			_ => return Err(Error::InvalidVersion),
		};

		let hash = AddressHash::from_slice(&data[1..21]).map_err(|_| Error::InvalidAddress)?;
		Ok(Address { kind, network, hash })
	}
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.layout().to_base58().fmt(f)
	}
}

impl FromStr for Address {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let data = s.from_base58().map_err(|_| Error::InvalidAddress)?;
		Address::from_layout(&data)
	}
}

impl From<&'static str> for Address {
	fn from(s: &'static str) -> Self {
		s.parse().unwrap()
	}
}
