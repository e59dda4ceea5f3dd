use super::{GeometryType, PopupConfig};
use serde::{Deserialize, Serialize};

/// How a layer is delivered to clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerFormat {
	Geometry,
	Image,
	Wmts,
}

/// One layer of a pack manifest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerEntry {
	pub id: String,
	pub display_name: String,
	pub source_file: String,
	pub format: LayerFormat,
	pub geometry_type: GeometryType,
	/// Output file (relative to the pack directory) holding the geometry or image.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub file: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tiled_file_ref: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub popup_config: Option<PopupConfig>,
	/// `[west, south, east, north]` in degrees
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub bounds: Option<[f64; 4]>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
}

impl LayerEntry {
	pub fn new(id: &str, display_name: &str, source_file: &str, format: LayerFormat, geometry_type: GeometryType) -> Self {
		Self {
			id: id.to_string(),
			display_name: display_name.to_string(),
			source_file: source_file.to_string(),
			format,
			geometry_type,
			file: None,
			tiled_file_ref: None,
			popup_config: None,
			bounds: None,
			url: None,
		}
	}
}

/// Derives a human readable layer name from a file stem: `main_roads-2024` → `main roads 2024`.
pub fn display_name_from_stem(stem: &str) -> String {
	stem
		.split(['_', '-'])
		.filter(|part| !part.trim().is_empty())
		.map(str::trim)
		.collect::<Vec<_>>()
		.join(" ")
}
