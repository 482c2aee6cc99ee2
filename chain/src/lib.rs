extern crate onyxcrypto;
extern crate primitives;
extern crate rayon;
extern crate serialization as ser;

pub use crate::block::Block;
pub use crate::block_header::{block_header_hash, BlockHeader};
pub use crate::indexed_transaction::IndexedTransaction;
pub use crate::merkle_root::{merkle_node_hash, merkle_root};
pub use crate::transaction::{JoinSplit, OutPoint, Transaction, TransactionInput, TransactionOutput};
pub use primitives::{bytes, compact, hash};

pub mod constants;

mod block;
mod block_header;
mod indexed_transaction;
mod merkle_root;
mod transaction;
