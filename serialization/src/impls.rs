use crate::compact_integer::CompactInteger;
use crate::reader::{Deserializable, Error as ReaderError, Reader};
use crate::stream::{Serializable, Stream};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use onyxcrypto::{Hash, SHA256D};
use primitives::bytes::Bytes;
use primitives::compact::Compact;
use primitives::hash::H256;
use std::io;

macro_rules! impl_ser_for_int {
	($int:ty, $write:ident, $read:ident) => {
		impl Serializable for $int {
			fn serialize(&self, stream: &mut Stream) {
				stream.$write::<LittleEndian>(*self).unwrap();
			}

			fn serialized_size(&self) -> usize {
				::std::mem::size_of::<$int>()
			}
		}

		impl Deserializable for $int {
			fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, ReaderError>
			where
				T: io::Read,
			{
				Ok(reader.$read::<LittleEndian>()?)
			}
		}
	};
}

impl Serializable for u8 {
	fn serialize(&self, stream: &mut Stream) {
		stream.write_u8(*self).unwrap();
	}

	fn serialized_size(&self) -> usize {
		1
	}
}

impl Deserializable for u8 {
	fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, ReaderError>
	where
		T: io::Read,
	{
		Ok(reader.read_u8()?)
	}
}

impl_ser_for_int!(u16, write_u16, read_u16);
impl_ser_for_int!(u32, write_u32, read_u32);
impl_ser_for_int!(u64, write_u64, read_u64);
impl_ser_for_int!(i32, write_i32, read_i32);
impl_ser_for_int!(i64, write_i64, read_i64);

impl Serializable for Bytes {
	fn serialize(&self, stream: &mut Stream) {
		stream.append(&CompactInteger::from(self.len())).append_slice(self);
	}

	fn serialized_size(&self) -> usize {
		CompactInteger::from(self.len()).serialized_size() + self.len()
	}
}

impl Deserializable for Bytes {
	fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, ReaderError>
	where
		T: io::Read,
	{
		let len: usize = reader.read::<CompactInteger>()?.into();
		let mut bytes = Bytes::new_with_len(len);
		reader.read_slice(&mut bytes)?;
		Ok(bytes)
	}
}

impl Serializable for Compact {
	fn serialize(&self, stream: &mut Stream) {
		stream.append(&u32::from(*self));
	}

	fn serialized_size(&self) -> usize {
		4
	}
}

impl Deserializable for Compact {
	fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, ReaderError>
	where
		T: io::Read,
	{
		reader.read::<u32>().map(Compact::new)
	}
}

impl Serializable for H256 {
	fn serialize(&self, stream: &mut Stream) {
		stream.append_slice(&**self);
	}

	fn serialized_size(&self) -> usize {
		32
	}
}

impl Deserializable for H256 {
	fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, ReaderError>
	where
		T: io::Read,
	{
		let mut result = H256::default();
		reader.read_slice(&mut *result)?;
		Ok(result)
	}
}

impl Serializable for SHA256D {
	fn serialize(&self, stream: &mut Stream) {
		stream.append_slice(&self[..]);
	}

	fn serialized_size(&self) -> usize {
		32
	}
}

impl Deserializable for SHA256D {
	fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, ReaderError>
	where
		T: io::Read,
	{
		let mut result = [0u8; 32];
		reader.read_slice(&mut result)?;
		Ok(SHA256D::from_inner(result))
	}
}
