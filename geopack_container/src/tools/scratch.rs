use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A private working directory for one tiling run, removed when dropped.
///
/// External tools only ever see the fixed ASCII file names below, whatever the layer is called.
#[derive(Debug)]
pub struct ScratchDir {
	dir: TempDir,
}

impl ScratchDir {
	pub const INPUT: &'static str = "input.geojson";
	pub const MBTILES: &'static str = "tiles.mbtiles";
	pub const PMTILES: &'static str = "tiles.pmtiles";

	/// Creates the directory inside `parent`, or inside the system temporary directory.
	pub fn new(parent: Option<&Path>) -> Result<Self> {
		let mut builder = tempfile::Builder::new();
		builder.prefix("geopack-tiling-");
		let dir = match parent {
			Some(parent) => builder.tempdir_in(parent),
			None => builder.tempdir(),
		}
		.context("creating scratch directory")?;
		Ok(Self { dir })
	}

	pub fn path(&self) -> &Path {
		self.dir.path()
	}

	pub fn input(&self) -> PathBuf {
		self.dir.path().join(Self::INPUT)
	}

	pub fn mbtiles(&self) -> PathBuf {
		self.dir.path().join(Self::MBTILES)
	}

	pub fn pmtiles(&self) -> PathBuf {
		self.dir.path().join(Self::PMTILES)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn removed_on_drop() -> Result<()> {
		let parent = tempfile::tempdir()?;
		let scratch = ScratchDir::new(Some(parent.path()))?;
		let path = scratch.path().to_path_buf();
		std::fs::write(scratch.input(), "{}")?;
		assert!(scratch.input().ends_with("input.geojson"));
		assert!(path.starts_with(parent.path()));

		drop(scratch);
		assert!(!path.exists());
		Ok(())
	}
}
