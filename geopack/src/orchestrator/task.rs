use anyhow::Result;
use geopack_core::{CacheEntry, GeometryType, LayerEntry, LayerFormat, PopupConfig, StyleConfig};
use std::path::PathBuf;

/// Lifecycle of one task. Cached tasks never reach the worker pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskState {
	Pending,
	Cached,
	Processing,
	Succeeded,
	Failed,
}

/// Transform, style and possibly tile one geometry document.
#[derive(Clone, Debug)]
pub struct LayerTask {
	pub pack_id: String,
	pub id: String,
	pub display_name: String,
	pub source: PathBuf,
	/// source path relative to the pack directory
	pub source_file: String,
	pub style: Option<PathBuf>,
	pub popup: Option<PopupConfig>,
	pub content_hash: String,
	pub cache_key: String,
	pub output_dir: PathBuf,
	/// geometry type remembered from an earlier run
	pub known_geometry_type: Option<GeometryType>,
}

impl LayerTask {
	pub fn geometry_file(&self) -> String {
		format!("{}.geojson", self.id)
	}

	pub fn tiles_file(&self) -> String {
		format!("{}.pmtiles", self.id)
	}

	pub fn geometry_output(&self) -> PathBuf {
		self.output_dir.join(self.geometry_file())
	}

	pub fn tiles_output(&self) -> PathBuf {
		self.output_dir.join(self.tiles_file())
	}

	/// The manifest entry, tiled when the archive exists.
	pub fn entry(&self, geometry_type: GeometryType) -> LayerEntry {
		let mut entry = LayerEntry::new(
			&self.id,
			&self.display_name,
			&self.source_file,
			LayerFormat::Geometry,
			geometry_type,
		);
		entry.file = Some(self.geometry_file());
		entry.popup_config.clone_from(&self.popup);
		if self.tiles_output().is_file() {
			entry.tiled_file_ref = Some(self.tiles_file());
		}
		entry
	}
}

/// Copy one raster image into the catalog.
#[derive(Clone, Debug)]
pub struct ImageTask {
	pub pack_id: String,
	pub id: String,
	pub display_name: String,
	pub source: PathBuf,
	pub source_file: String,
	pub bounds_file: Option<PathBuf>,
	pub output_dir: PathBuf,
}

impl ImageTask {
	/// `<id>.png` or `<id>.jpg`
	pub fn output_file(&self) -> String {
		let extension = self
			.source
			.extension()
			.map(|extension| extension.to_string_lossy().to_ascii_lowercase())
			.unwrap_or_default();
		let extension = if extension == "jpeg" { String::from("jpg") } else { extension };
		format!("{}.{extension}", self.id)
	}
}

#[derive(Clone, Debug)]
pub enum Task {
	Layer(LayerTask),
	Image(ImageTask),
}

impl Task {
	pub fn pack_id(&self) -> &str {
		match self {
			Task::Layer(task) => &task.pack_id,
			Task::Image(task) => &task.pack_id,
		}
	}

	pub fn cache_key(&self) -> Option<&str> {
		match self {
			Task::Layer(task) => Some(&task.cache_key),
			Task::Image(_) => None,
		}
	}

	pub fn describe(&self) -> String {
		match self {
			Task::Layer(task) => format!("layer '{}/{}'", task.pack_id, task.source_file),
			Task::Image(task) => format!("image '{}/{}'", task.pack_id, task.source_file),
		}
	}
}

/// What a finished task contributes to the catalog.
#[derive(Clone, Debug)]
pub struct Completed {
	pub entry: LayerEntry,
	pub style: StyleConfig,
	pub cache_entry: Option<CacheEntry>,
	/// the geometry was reprojected
	pub transformed: bool,
	/// a fresh tiled artifact was written
	pub tiled: bool,
	pub copied: bool,
	/// the transformer ran, reprojecting or copying
	pub transform_ran: bool,
	/// the tiler ran, successfully or not
	pub tiler_ran: bool,
}

/// The result of one task as seen by the coordinator.
#[derive(Debug)]
pub struct TaskOutcome {
	pub pack_id: String,
	pub description: String,
	pub cache_key: Option<String>,
	pub state: TaskState,
	pub result: Result<Completed>,
}
