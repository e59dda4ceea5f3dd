use std::fmt;

/// Serialized, compressed root directory plus the concatenated leaf directories.
pub struct Directory {
	pub root_bytes: Vec<u8>,
	pub leaves_bytes: Vec<u8>,
}

impl fmt::Debug for Directory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Directory")
			.field("root_bytes", &self.root_bytes.len())
			.field("leaves_bytes", &self.leaves_bytes.len())
			.finish()
	}
}
