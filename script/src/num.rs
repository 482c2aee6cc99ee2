/// Little-endian, sign-and-magnitude integer encoding used inside scripts.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ScriptNum(i64);

impl From<i64> for ScriptNum {
	fn from(value: i64) -> Self {
		ScriptNum(value)
	}
}

impl From<u32> for ScriptNum {
	fn from(value: u32) -> Self {
		ScriptNum(value as i64)
	}
}

impl ScriptNum {
	pub fn value(&self) -> i64 {
		self.0
	}

	pub fn serialize(&self) -> Vec<u8> {
		if self.0 == 0 {
			return Vec::new();
		}

		let negative = self.0 < 0;
		let mut absolute = self.0.unsigned_abs();
		let mut result = Vec::with_capacity(9);
		while absolute > 0 {
			result.push((absolute & 0xff) as u8);
			absolute >>= 8;
		}

		// The most significant bit carries the sign; spill into an extra
		// byte when the magnitude already uses it.
		if result[result.len() - 1] & 0x80 != 0 {
			result.push(if negative { 0x80 } else { 0x00 });
		} else if negative {
			let last = result.len() - 1;
			result[last] |= 0x80;
		}

		result
	}
}

#[cfg(test)]
mod tests {
	use super::ScriptNum;

	#[test]
	fn test_serialize() {
		assert_eq!(ScriptNum::from(0i64).serialize(), Vec::<u8>::new());
		assert_eq!(ScriptNum::from(1i64).serialize(), vec![0x01]);
		assert_eq!(ScriptNum::from(0x7fi64).serialize(), vec![0x7f]);
		assert_eq!(ScriptNum::from(0x80i64).serialize(), vec![0x80, 0x00]);
		assert_eq!(ScriptNum::from(0x1234i64).serialize(), vec![0x34, 0x12]);
		assert_eq!(ScriptNum::from(-1i64).serialize(), vec![0x81]);
		assert_eq!(ScriptNum::from(-0x80i64).serialize(), vec![0x80, 0x80]);
		assert_eq!(ScriptNum::from(202_500u32).serialize(), vec![0x04, 0x17, 0x03]);
	}
}
