extern crate byteorder;
extern crate onyxcrypto;
extern crate primitives;

mod compact_integer;
mod impls;
mod reader;
mod stream;

pub use primitives::{bytes, compact, hash};

pub use crate::compact_integer::CompactInteger;
pub use crate::reader::{deserialize, deserialize_iterator, Deserializable, Error, ReadIterator, Reader};
pub use crate::stream::{serialize, serialize_list, serialized_list_size, Serializable, Stream};
