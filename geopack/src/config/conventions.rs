use serde::Deserialize;
use std::path::Path;

/// File layout of a pack.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Conventions {
	pub geometry_folder: String,
	pub styles_folder: String,
	pub images_folder: String,
	pub geometry_extensions: Vec<String>,
	pub style_extensions: Vec<String>,
	pub image_extensions: Vec<String>,
	/// Global popup definitions, in the source root.
	pub popup_config: String,
	/// Static raster layer declarations, in a pack directory.
	pub wmts_config: String,
	/// Suffix of the `[west, south, east, north]` sidecar next to an image.
	pub bounds_suffix: String,
}

impl Default for Conventions {
	fn default() -> Self {
		let strings = |values: &[&str]| -> Vec<String> { values.iter().map(|value| (*value).to_string()).collect() };
		Self {
			geometry_folder: String::from("gis"),
			styles_folder: String::from("styles"),
			images_folder: String::from("images"),
			geometry_extensions: strings(&["geojson", "json"]),
			style_extensions: strings(&["lyrx", "json"]),
			image_extensions: strings(&["png", "jpg", "jpeg"]),
			popup_config: String::from("popup-config.json"),
			wmts_config: String::from("wmts.config.json"),
			bounds_suffix: String::from(".bounds.json"),
		}
	}
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
	path
		.extension()
		.and_then(|extension| extension.to_str())
		.is_some_and(|extension| extensions.iter().any(|e| e.eq_ignore_ascii_case(extension)))
}

impl Conventions {
	/// Whether `path` is a geometry document. Configuration files and image sidecars share the
	/// extension but are never geometry.
	pub fn is_geometry_file(&self, path: &Path) -> bool {
		let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
			return false;
		};
		name != self.popup_config
			&& name != self.wmts_config
			&& !name.ends_with(&self.bounds_suffix)
			&& has_extension(path, &self.geometry_extensions)
	}

	pub fn is_style_file(&self, path: &Path) -> bool {
		has_extension(path, &self.style_extensions)
	}

	pub fn is_image_file(&self, path: &Path) -> bool {
		has_extension(path, &self.image_extensions)
	}
}
