use super::{ByteRange, Directory, gzip, write_varint};
use anyhow::Result;

/// Root directories of more entries than this are always split into leaves.
const MAX_ROOT_ENTRIES: usize = 16384;

/// One directory entry. A `run_length` of 0 marks a pointer to a leaf directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryV3 {
	pub tile_id: u64,
	pub range: ByteRange,
	pub run_length: u32,
}

impl EntryV3 {
	pub fn new(tile_id: u64, range: ByteRange, run_length: u32) -> Self {
		Self {
			tile_id,
			range,
			run_length,
		}
	}
}

/// Directory entries sorted by tile id.
#[derive(Debug, Default, PartialEq)]
pub struct EntriesV3 {
	entries: Vec<EntryV3>,
}

impl EntriesV3 {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, entry: EntryV3) {
		self.entries.push(entry);
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Number of tiles addressed, counting every tile of a run.
	pub fn tile_count(&self) -> u64 {
		self.entries.iter().map(|entry| u64::from(entry.run_length)).sum()
	}

	/// Builds the gzip-compressed root directory and, when it would not fit into
	/// `target_root_len` bytes, the leaf directories it points to.
	pub fn to_directory(&self, target_root_len: usize) -> Result<Directory> {
		if self.entries.len() < MAX_ROOT_ENTRIES {
			let root_bytes = gzip(&serialize_entries(&self.entries))?;
			if root_bytes.len() <= target_root_len {
				return Ok(Directory {
					root_bytes,
					leaves_bytes: Vec::new(),
				});
			}
		}

		// root of leaf pointers only: grow the leaves until the root fits
		let mut leaf_size = (self.entries.len() as f64 / 3500.0).max(4096.0);
		loop {
			let directory = build_root_and_leaves(&self.entries, leaf_size as usize)?;
			if directory.root_bytes.len() <= target_root_len {
				log::debug!("split directory into leaves of {} entries", leaf_size as usize);
				return Ok(directory);
			}
			leaf_size *= 1.2;
		}
	}
}

fn build_root_and_leaves(entries: &[EntryV3], leaf_size: usize) -> Result<Directory> {
	let mut root = Vec::new();
	let mut leaves_bytes = Vec::new();
	for chunk in entries.chunks(leaf_size) {
		let leaf = gzip(&serialize_entries(chunk))?;
		root.push(EntryV3::new(
			chunk[0].tile_id,
			ByteRange::new(leaves_bytes.len() as u64, leaf.len() as u64),
			0,
		));
		leaves_bytes.extend_from_slice(&leaf);
	}
	Ok(Directory {
		root_bytes: gzip(&serialize_entries(&root))?,
		leaves_bytes,
	})
}

/// Serializes entries column-wise: count, id deltas, run lengths, lengths, offsets.
///
/// An offset directly following the previous entry is written as 0, any other as offset + 1.
pub fn serialize_entries(entries: &[EntryV3]) -> Vec<u8> {
	let mut buffer = Vec::new();
	write_varint(&mut buffer, entries.len() as u64);

	let mut last_id = 0;
	for entry in entries {
		write_varint(&mut buffer, entry.tile_id - last_id);
		last_id = entry.tile_id;
	}
	for entry in entries {
		write_varint(&mut buffer, u64::from(entry.run_length));
	}
	for entry in entries {
		write_varint(&mut buffer, entry.range.length);
	}
	for (index, entry) in entries.iter().enumerate() {
		let contiguous = index > 0 && entry.range.offset == entries[index - 1].range.end();
		write_varint(&mut buffer, if contiguous { 0 } else { entry.range.offset + 1 });
	}
	buffer
}

#[cfg(test)]
pub fn deserialize_entries(mut bytes: &[u8]) -> Result<Vec<EntryV3>> {
	use super::read_varint;

	let count = read_varint(&mut bytes)? as usize;
	let mut entries = Vec::with_capacity(count);
	let mut last_id = 0;
	for _ in 0..count {
		last_id += read_varint(&mut bytes)?;
		entries.push(EntryV3::new(last_id, ByteRange::default(), 0));
	}
	for entry in &mut entries {
		entry.run_length = read_varint(&mut bytes)? as u32;
	}
	for entry in &mut entries {
		entry.range.length = read_varint(&mut bytes)?;
	}
	for index in 0..count {
		let value = read_varint(&mut bytes)?;
		entries[index].range.offset = if index > 0 && value == 0 {
			entries[index - 1].range.end()
		} else {
			value - 1
		};
	}
	Ok(entries)
}
