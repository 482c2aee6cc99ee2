//! Variable-length integer used to prefix lists and byte strings.

use crate::reader::{Deserializable, Error as ReaderError, Reader};
use crate::stream::{Serializable, Stream};
use std::{fmt, io};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CompactInteger(u64);

impl fmt::Display for CompactInteger {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.0.fmt(f)
	}
}

impl From<CompactInteger> for u64 {
	fn from(i: CompactInteger) -> Self {
		i.0
	}
}

impl From<CompactInteger> for usize {
	fn from(i: CompactInteger) -> Self {
		i.0 as usize
	}
}

impl From<u8> for CompactInteger {
	fn from(i: u8) -> Self {
		CompactInteger(i as u64)
	}
}

impl From<u16> for CompactInteger {
	fn from(i: u16) -> Self {
		CompactInteger(i as u64)
	}
}

impl From<u32> for CompactInteger {
	fn from(i: u32) -> Self {
		CompactInteger(i as u64)
	}
}

impl From<usize> for CompactInteger {
	fn from(i: usize) -> Self {
		CompactInteger(i as u64)
	}
}

impl From<u64> for CompactInteger {
	fn from(i: u64) -> Self {
		CompactInteger(i)
	}
}

impl Serializable for CompactInteger {
	fn serialize(&self, stream: &mut Stream) {
		match self.0 {
			0..=0xfc => {
				stream.append(&(self.0 as u8));
			}
			0xfd..=0xffff => {
				stream.append(&0xfdu8).append(&(self.0 as u16));
			}
			0x10000..=0xffff_ffff => {
				stream.append(&0xfeu8).append(&(self.0 as u32));
			}
			_ => {
				stream.append(&0xffu8).append(&self.0);
			}
		}
	}

	fn serialized_size(&self) -> usize {
		match self.0 {
			0..=0xfc => 1,
			0xfd..=0xffff => 3,
			0x10000..=0xffff_ffff => 5,
			_ => 9,
		}
	}
}

impl Deserializable for CompactInteger {
	fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, ReaderError>
	where
		T: io::Read,
	{
		let result = match reader.read::<u8>()? {
			i @ 0..=0xfc => i.into(),
			0xfd => reader.read::<u16>()?.into(),
			0xfe => reader.read::<u32>()?.into(),
			_ => reader.read::<u64>()?.into(),
		};

		Ok(result)
	}
}

#[cfg(test)]
mod tests {
	use super::CompactInteger;
	use crate::reader::{deserialize, Error as ReaderError};
	use crate::stream::{serialize, Serializable};

	#[test]
	fn test_compact_integer_stream() {
		let values: Vec<CompactInteger> = vec![
			0u64.into(),
			0xfcu64.into(),
			0xfdu64.into(),
			0xffffu64.into(),
			0x10000u64.into(),
			0xffff_ffffu64.into(),
			0x1_0000_0000u64.into(),
		];
		let expected: Vec<u8> = vec![
			0x00, 0xfc, 0xfd, 0xfd, 0x00, 0xfd, 0xff, 0xff, 0xfe, 0x00, 0x00, 0x01, 0x00, 0xfe, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00,
			0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
		];

		let mut stream = crate::stream::Stream::default();
		for value in &values {
			stream.append(value);
		}
		assert_eq!(stream.out(), expected.into());
	}

	#[test]
	fn test_compact_integer_serialized_size() {
		let sizes: Vec<(CompactInteger, usize)> = vec![
			(0xfcu64.into(), 1),
			(0xfdu64.into(), 3),
			(0xffffu64.into(), 3),
			(0x10000u64.into(), 5),
			(0xffff_ffffu64.into(), 5),
			(0x1_0000_0000u64.into(), 9),
		];
		for (value, size) in sizes {
			assert_eq!(serialize(&value).len(), size);
			assert_eq!(value.serialized_size(), size);
		}
	}

	#[test]
	fn test_compact_integer_deserialize() {
		assert_eq!(CompactInteger::from(0u64), deserialize(&[0x00u8][..]).unwrap());
		assert_eq!(CompactInteger::from(0xfcu64), deserialize(&[0xfcu8][..]).unwrap());
		assert_eq!(CompactInteger::from(0xfdu64), deserialize(&[0xfdu8, 0xfd, 0x00][..]).unwrap());
		assert_eq!(
			CompactInteger::from(0x10000u64),
			deserialize(&[0xfeu8, 0x00, 0x00, 0x01, 0x00][..]).unwrap()
		);
		let err: Result<CompactInteger, ReaderError> = deserialize(&[0xfdu8][..]);
		assert!(err.is_err());
	}
}
