use geopack_core::Complexity;
use serde::Deserialize;
use std::time::Duration;

const MB: u64 = 1024 * 1024;

/// Settings of the tiling pipeline, the `tiling` section of the configuration file.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TilingConfig {
	pub enabled: bool,
	/// Source documents larger than this are tiled regardless of their style.
	pub size_threshold_bytes: u64,
	/// MBTiles databases up to this size are converted in-process, larger ones with `pmtiles`.
	pub in_process_limit_bytes: u64,
	pub min_zoom: u8,
	pub max_zoom: u8,
	pub drop_densest: bool,
	pub tippecanoe: String,
	pub pmtiles: String,
	/// Kill an external tool that runs longer than this.
	pub tool_timeout_seconds: Option<u64>,
}

impl Default for TilingConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			size_threshold_bytes: 15 * MB,
			in_process_limit_bytes: 2 * MB,
			min_zoom: 4,
			max_zoom: 14,
			drop_densest: true,
			tippecanoe: String::from("tippecanoe"),
			pmtiles: String::from("pmtiles"),
			tool_timeout_seconds: None,
		}
	}
}

impl TilingConfig {
	pub fn tool_timeout(&self) -> Option<Duration> {
		self.tool_timeout_seconds.map(Duration::from_secs)
	}
}

/// Whether a layer gets a tiled artifact: it is large, or its style cannot be drawn from
/// plain GeoJSON.
pub fn should_tile(source_size: u64, complexity: Complexity, config: &TilingConfig) -> bool {
	config.enabled && (source_size > config.size_threshold_bytes || complexity.is_advanced())
}
