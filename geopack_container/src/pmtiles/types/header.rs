use super::{ByteRange, PMTilesCompression, PMTilesType};
use anyhow::{Result, ensure};
use byteorder::{LittleEndian as LE, WriteBytesExt};

/// The fixed-size header at the start of every PMTiles v3 archive.
#[derive(Clone, Debug, PartialEq)]
pub struct HeaderV3 {
	pub root_dir: ByteRange,
	pub metadata: ByteRange,
	pub leaf_dirs: ByteRange,
	pub tile_data: ByteRange,
	pub addressed_tiles_count: u64,
	pub tile_entries_count: u64,
	pub tile_contents_count: u64,
	pub clustered: bool,
	pub internal_compression: PMTilesCompression,
	pub tile_compression: PMTilesCompression,
	pub tile_type: PMTilesType,
	pub min_zoom: u8,
	pub max_zoom: u8,
	pub min_lon_e7: i32,
	pub min_lat_e7: i32,
	pub max_lon_e7: i32,
	pub max_lat_e7: i32,
	pub center_zoom: u8,
	pub center_lon_e7: i32,
	pub center_lat_e7: i32,
}

impl HeaderV3 {
	pub const LEN: u64 = 127;

	/// Converts degrees into the fixed point representation of the header.
	pub fn e7(degrees: f64) -> i32 {
		(degrees * 1e7).round() as i32
	}

	/// A header of a world-wide archive with `tile_type` tiles; everything else is filled in by
	/// the writer.
	pub fn new(tile_type: PMTilesType, tile_compression: PMTilesCompression) -> Self {
		Self {
			root_dir: ByteRange::default(),
			metadata: ByteRange::default(),
			leaf_dirs: ByteRange::default(),
			tile_data: ByteRange::default(),
			addressed_tiles_count: 0,
			tile_entries_count: 0,
			tile_contents_count: 0,
			clustered: false,
			internal_compression: PMTilesCompression::Gzip,
			tile_compression,
			tile_type,
			min_zoom: 0,
			max_zoom: 0,
			min_lon_e7: Self::e7(-180.0),
			min_lat_e7: Self::e7(-85.051_128_779_806_6),
			max_lon_e7: Self::e7(180.0),
			max_lat_e7: Self::e7(85.051_128_779_806_6),
			center_zoom: 0,
			center_lon_e7: 0,
			center_lat_e7: 0,
		}
	}

	/// Sets the bounds from `[west, south, east, north]` in degrees.
	pub fn set_bounds(&mut self, bounds: [f64; 4]) {
		self.min_lon_e7 = Self::e7(bounds[0]);
		self.min_lat_e7 = Self::e7(bounds[1]);
		self.max_lon_e7 = Self::e7(bounds[2]);
		self.max_lat_e7 = Self::e7(bounds[3]);
	}

	pub fn set_center(&mut self, lon: f64, lat: f64, zoom: u8) {
		self.center_lon_e7 = Self::e7(lon);
		self.center_lat_e7 = Self::e7(lat);
		self.center_zoom = zoom;
	}

	pub fn serialize(&self) -> Result<Vec<u8>> {
		let mut header: Vec<u8> = Vec::with_capacity(Self::LEN as usize);
		header.extend_from_slice(b"PMTiles");
		header.write_u8(3)?;

		for range in [&self.root_dir, &self.metadata, &self.leaf_dirs, &self.tile_data] {
			header.write_u64::<LE>(range.offset)?;
			header.write_u64::<LE>(range.length)?;
		}
		header.write_u64::<LE>(self.addressed_tiles_count)?;
		header.write_u64::<LE>(self.tile_entries_count)?;
		header.write_u64::<LE>(self.tile_contents_count)?;

		header.write_u8(u8::from(self.clustered))?;
		header.write_u8(self.internal_compression as u8)?;
		header.write_u8(self.tile_compression as u8)?;
		header.write_u8(self.tile_type as u8)?;
		header.write_u8(self.min_zoom)?;
		header.write_u8(self.max_zoom)?;

		header.write_i32::<LE>(self.min_lon_e7)?;
		header.write_i32::<LE>(self.min_lat_e7)?;
		header.write_i32::<LE>(self.max_lon_e7)?;
		header.write_i32::<LE>(self.max_lat_e7)?;

		header.write_u8(self.center_zoom)?;
		header.write_i32::<LE>(self.center_lon_e7)?;
		header.write_i32::<LE>(self.center_lat_e7)?;

		ensure!(header.len() as u64 == Self::LEN, "PMTiles header has {} bytes", header.len());
		Ok(header)
	}
}
