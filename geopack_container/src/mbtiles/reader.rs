//! Read access to MBTiles (SQLite) databases as written by tippecanoe.

use anyhow::{Context, Result, ensure};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::{
	collections::BTreeMap,
	path::{Path, PathBuf},
};

/// A tile with XYZ coordinates (row 0 at the top).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileRecord {
	pub z: u8,
	pub x: u32,
	pub y: u32,
	pub data: Vec<u8>,
}

/// Converts a TMS row (row 0 at the bottom) into an XYZ row.
pub fn flip_row(z: u8, row: u32) -> Result<u32> {
	ensure!(z < 32, "zoom level {z} is too high");
	let rows = 1u64 << z;
	ensure!(u64::from(row) < rows, "row {row} lies outside zoom level {z}");
	Ok((rows - 1 - u64::from(row)) as u32)
}

pub struct MBTilesReader {
	path: PathBuf,
	pool: Pool<SqliteConnectionManager>,
}

impl MBTilesReader {
	pub fn open(path: &Path) -> Result<MBTilesReader> {
		log::debug!("open {path:?}");
		ensure!(path.is_file(), "MBTiles file {path:?} does not exist");

		let manager = SqliteConnectionManager::file(path);
		let pool = Pool::builder()
			.max_size(2)
			.build(manager)
			.with_context(|| format!("opening SQLite database {path:?}"))?;
		Ok(MBTilesReader {
			path: path.to_path_buf(),
			pool,
		})
	}

	/// All rows of the `metadata` table.
	pub fn metadata(&self) -> Result<BTreeMap<String, String>> {
		let conn = self.pool.get()?;
		let mut stmt = conn
			.prepare("SELECT name, value FROM metadata")
			.with_context(|| format!("reading metadata of {:?}", self.path))?;
		let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

		let mut metadata = BTreeMap::new();
		for row in rows {
			let (name, value) = row?;
			metadata.insert(name, value);
		}
		Ok(metadata)
	}

	pub fn tile_count(&self) -> Result<u64> {
		let conn = self.pool.get()?;
		let count: i64 = conn.query_row("SELECT COUNT(*) FROM tiles", [], |row| row.get(0))?;
		Ok(count as u64)
	}

	/// Calls `callback` for every tile, with the row already flipped to XYZ.
	pub fn for_each_tile(&self, mut callback: impl FnMut(TileRecord) -> Result<()>) -> Result<()> {
		let conn = self.pool.get()?;
		let mut stmt = conn
			.prepare("SELECT zoom_level, tile_column, tile_row, tile_data FROM tiles")
			.with_context(|| format!("reading tiles of {:?}", self.path))?;
		let mut rows = stmt.query([])?;
		while let Some(row) = rows.next()? {
			let z: u8 = row.get(0)?;
			let x: u32 = row.get(1)?;
			let tms_row: u32 = row.get(2)?;
			let data: Vec<u8> = row.get(3)?;
			callback(TileRecord {
				z,
				x,
				y: flip_row(z, tms_row)?,
				data,
			})?;
		}
		Ok(())
	}
}
