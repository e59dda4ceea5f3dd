use super::types::{ByteRange, EntriesV3, EntryV3, HeaderV3, PMTilesCompression, PMTilesType, gzip, tile_id};
use anyhow::{Context, Result, ensure};
use serde_json::Value;
use std::{
	collections::BTreeMap,
	fs::File,
	io::{BufWriter, Write},
	path::Path,
};

/// Tile data starts here; the header and the root directory must fit in front of it.
const DATA_START: u64 = 16384;

/// Collects tiles in memory and writes them as one clustered PMTiles archive.
///
/// Consecutive tile ids with identical content are stored once, as a run.
#[derive(Debug)]
pub struct PMTilesWriter {
	header: HeaderV3,
	metadata: Value,
	tiles: BTreeMap<u64, Vec<u8>>,
	zoom_range: Option<(u8, u8)>,
}

impl PMTilesWriter {
	pub fn new(tile_type: PMTilesType, tile_compression: PMTilesCompression) -> Self {
		Self {
			header: HeaderV3::new(tile_type, tile_compression),
			metadata: Value::Object(serde_json::Map::new()),
			tiles: BTreeMap::new(),
			zoom_range: None,
		}
	}

	/// Bounds, center and tile properties. Counts, ranges and zoom levels are overwritten when
	/// the archive is written.
	pub fn header_mut(&mut self) -> &mut HeaderV3 {
		&mut self.header
	}

	pub fn set_metadata(&mut self, metadata: Value) {
		self.metadata = metadata;
	}

	pub fn add_tile(&mut self, z: u8, x: u32, y: u32, data: Vec<u8>) -> Result<()> {
		let id = tile_id(z, x, y)?;
		self.tiles.insert(id, data);
		self.zoom_range = Some(match self.zoom_range {
			Some((min, max)) => (min.min(z), max.max(z)),
			None => (z, z),
		});
		Ok(())
	}

	pub fn tile_count(&self) -> usize {
		self.tiles.len()
	}

	/// Writes the archive and returns the final header.
	pub fn write_to(&self, writer: &mut impl Write) -> Result<HeaderV3> {
		let mut header = self.header.clone();
		if let Some((min, max)) = self.zoom_range {
			header.min_zoom = min;
			header.max_zoom = max;
			header.center_zoom = header.center_zoom.clamp(min, max);
		}

		let metadata = gzip(&serde_json::to_vec(&self.metadata)?)?;
		header.metadata = ByteRange::new(DATA_START, metadata.len() as u64);

		let tile_data_start = header.metadata.end();
		let mut tile_data: Vec<u8> = Vec::new();
		let mut entries = EntriesV3::new();
		let mut previous: Option<(EntryV3, &[u8])> = None;
		let mut contents = 0u64;
		for (&id, data) in &self.tiles {
			if let Some((entry, previous_data)) = &mut previous
				&& entry.tile_id + u64::from(entry.run_length) == id
				&& *previous_data == data.as_slice()
			{
				entry.run_length += 1;
				continue;
			}
			if let Some((entry, _)) = previous.take() {
				entries.push(entry);
			}
			let range = ByteRange::new(tile_data.len() as u64, data.len() as u64);
			tile_data.extend_from_slice(data);
			contents += 1;
			previous = Some((EntryV3::new(id, range, 1), data.as_slice()));
		}
		if let Some((entry, _)) = previous {
			entries.push(entry);
		}
		header.tile_data = ByteRange::new(tile_data_start, tile_data.len() as u64);

		let directory = entries.to_directory((DATA_START - HeaderV3::LEN) as usize)?;
		header.root_dir = ByteRange::new(HeaderV3::LEN, directory.root_bytes.len() as u64);
		header.leaf_dirs = ByteRange::new(header.tile_data.end(), directory.leaves_bytes.len() as u64);

		header.clustered = true;
		header.internal_compression = PMTilesCompression::Gzip;
		header.addressed_tiles_count = entries.tile_count();
		header.tile_entries_count = entries.len() as u64;
		header.tile_contents_count = contents;

		let header_bytes = header.serialize()?;
		let padding = DATA_START as usize - header_bytes.len() - directory.root_bytes.len();
		writer.write_all(&header_bytes)?;
		writer.write_all(&directory.root_bytes)?;
		writer.write_all(&vec![0; padding])?;
		writer.write_all(&metadata)?;
		writer.write_all(&tile_data)?;
		writer.write_all(&directory.leaves_bytes)?;
		writer.flush()?;

		log::debug!(
			"wrote PMTiles archive: {} tiles, {} entries, {:?}",
			header.addressed_tiles_count,
			header.tile_entries_count,
			directory
		);
		Ok(header)
	}

	pub fn write_path(&self, path: &Path) -> Result<HeaderV3> {
		ensure!(!self.tiles.is_empty(), "no tiles to write to {path:?}");
		let file = File::create(path).with_context(|| format!("creating {path:?}"))?;
		let mut writer = BufWriter::new(file);
		self.write_to(&mut writer).with_context(|| format!("writing PMTiles {path:?}"))
	}
}
