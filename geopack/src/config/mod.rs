//! The optional YAML configuration file. Every section and every field has a default, so an
//! empty file (or no file at all) gives the standard layout.

mod base;
mod conventions;

pub use base::*;
pub use conventions::*;

use anyhow::{Context, Result};
use geopack_container::TilingConfig;
use geopack_geometry::RegionalProjection;
use serde::Deserialize;
use std::{fs::File, io::BufReader, io::Read, path::Path};

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GeopackConfig {
	/// Where inputs live inside a pack.
	pub conventions: Conventions,

	/// The projected reference assumed for documents outside the geographic envelope.
	pub projection: RegionalProjection,

	pub tiling: TilingConfig,

	/// The pack that always carries the satellite entry and all WMTS declarations.
	pub base: BasePackConfig,

	/// Name of the cache file inside the output directory.
	pub cache_file: String,

	/// Size of the worker pool. Defaults to one less than the number of CPUs.
	pub workers: Option<usize>,

	/// Nesting limit when flattening symbols.
	pub max_symbol_depth: usize,
}

impl Default for GeopackConfig {
	fn default() -> Self {
		Self {
			conventions: Conventions::default(),
			projection: RegionalProjection::default(),
			tiling: TilingConfig::default(),
			base: BasePackConfig::default(),
			cache_file: String::from(".layer-cache.json"),
			workers: None,
			max_symbol_depth: geopack_style::MAX_SYMBOL_DEPTH,
		}
	}
}

impl GeopackConfig {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening config file {path:?}"))?;
		Self::from_reader(BufReader::new(file)).with_context(|| format!("parsing config file {path:?}"))
	}
}
