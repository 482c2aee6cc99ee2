use crate::Error;

/// Types with a fixed byte layout used for base58check display.
pub trait DisplayLayout {
	type Target: std::ops::Deref<Target = [u8]>;

	fn layout(&self) -> Self::Target;

	fn from_layout(data: &[u8]) -> Result<Self, Error>
	where
		Self: Sized;
}
