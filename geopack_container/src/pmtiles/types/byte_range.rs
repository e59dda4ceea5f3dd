use std::fmt;

/// A section of a file.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteRange {
	pub offset: u64,
	pub length: u64,
}

impl ByteRange {
	pub fn new(offset: u64, length: u64) -> Self {
		Self { offset, length }
	}

	pub fn end(&self) -> u64 {
		self.offset + self.length
	}
}

impl fmt::Debug for ByteRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{}..{}]", self.offset, self.end())
	}
}
