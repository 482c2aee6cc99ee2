/// Smallest unit of the currency.
pub const COIN: u64 = 100_000_000;

/// Maximum amount of money in circulation.
pub const MAX_MONEY: u64 = 21_000_000 * COIN;

/// Maximum serialized size of a block.
pub const MAX_BLOCK_SIZE: usize = 2_000_000;

/// Maximum number of signature operations in a block.
pub const MAX_BLOCK_SIGOPS: usize = 20_000;

/// Number of blocks a coinbase output stays unspendable.
pub const COINBASE_MATURITY: u32 = 100;

/// Consensus limit on a coinbase script_sig.
pub const MAX_COINBASE_SCRIPT_SIG_SIZE: usize = 100;

/// Lock time values below this threshold are block heights, above it - unix timestamps.
pub const LOCKTIME_THRESHOLD: u32 = 500_000_000;

/// Sequence number that disables the input's relative lock.
pub const SEQUENCE_FINAL: u32 = 0xffff_ffff;

/// Serialized size of the opaque part of a shielded transfer descriptor:
/// everything after the two value-pool amounts (anchor, nullifiers,
/// commitments, ephemeral key, random seed, macs, proof, ciphertexts).
pub const JOIN_SPLIT_PAYLOAD_SIZE: usize = 1786;

/// Serialized size of a shielded signature.
pub const JOIN_SPLIT_SIG_SIZE: usize = 64;
