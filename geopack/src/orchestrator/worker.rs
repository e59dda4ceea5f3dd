use super::task::{Completed, ImageTask, LayerTask, Task};
use crate::config::GeopackConfig;
use anyhow::{Context, Result, anyhow, ensure};
use geopack_container::Tiler;
use geopack_core::{
	CacheEntry, GeometryType, LayerEntry, LayerFormat, StyleConfig,
	json::{read_json, write_atomic},
};
use geopack_geometry::{GeometryTransformer, read_geojson_file};
use geopack_style::StyleInterpreter;
use log::{debug, warn};
use std::{fs, path::Path, sync::Arc};

/// Runs a blocking closure on the blocking thread pool.
async fn blocking<T, F>(work: F) -> Result<T>
where
	T: Send + 'static,
	F: FnOnce() -> Result<T> + Send + 'static,
{
	tokio::task::spawn_blocking(work)
		.await
		.map_err(|error| anyhow!("worker thread failed: {error}"))?
}

fn remove_stale(path: &Path) -> Result<()> {
	if path.is_file() {
		debug!("removing stale {path:?}");
		fs::remove_file(path).with_context(|| format!("removing {path:?}"))?;
	}
	Ok(())
}

/// Transformed geometry plus its style, before tiling.
struct Prepared {
	geometry_type: GeometryType,
	style: StyleConfig,
	source_size: u64,
	reprojected: bool,
}

/// Everything a task needs, shared by all tasks of a run.
#[derive(Debug)]
pub struct Worker {
	transformer: GeometryTransformer,
	interpreter: StyleInterpreter,
	tiler: Tiler,
	metadata_only: bool,
}

impl Worker {
	pub fn new(config: &GeopackConfig, metadata_only: bool) -> Self {
		Self {
			transformer: GeometryTransformer::new(config.projection.clone()),
			interpreter: StyleInterpreter::new(config.max_symbol_depth),
			tiler: Tiler::new(config.tiling.clone()),
			metadata_only,
		}
	}

	pub async fn run(self: Arc<Self>, task: Task) -> Result<Completed> {
		let worker = Arc::clone(&self);
		match task {
			Task::Layer(task) if self.metadata_only => blocking(move || worker.refresh_layer(&task)).await,
			Task::Layer(task) => self.process_layer(task).await,
			Task::Image(task) => blocking(move || worker.copy_image(&task)).await,
		}
	}

	fn style_for(&self, style: Option<&Path>, geometry_type: GeometryType) -> StyleConfig {
		match style {
			Some(path) => self.interpreter.interpret_file(path, geometry_type),
			None => StyleConfig::fallback(geometry_type),
		}
	}

	fn prepare_layer(&self, task: &LayerTask) -> Result<Prepared> {
		let source_size = fs::metadata(&task.source)
			.with_context(|| format!("reading {:?}", task.source))?
			.len();
		fs::create_dir_all(&task.output_dir).with_context(|| format!("creating {:?}", task.output_dir))?;
		let outcome = self.transformer.transform_file(&task.source, &task.geometry_output())?;

		let style = self.style_for(task.style.as_deref(), outcome.geometry_type);
		let geometry_type = match outcome.geometry_type {
			GeometryType::Unknown => style.geometry_type,
			known => known,
		};
		Ok(Prepared {
			geometry_type,
			style,
			source_size,
			reprojected: outcome.reprojected,
		})
	}

	async fn process_layer(self: Arc<Self>, task: LayerTask) -> Result<Completed> {
		let worker = Arc::clone(&self);
		let blocking_task = task.clone();
		let prepared = blocking(move || worker.prepare_layer(&blocking_task)).await?;

		let tiles = task.tiles_output();
		let mut tiled = false;
		let tiler_ran = self.tiler.should_tile(prepared.source_size, prepared.style.complexity);
		if tiler_ran {
			let high_fidelity = prepared.style.complexity.is_advanced();
			match self.tiler.tile(&task.geometry_output(), &tiles, high_fidelity).await {
				Ok(report) => {
					debug!("tiled '{}/{}' as vector layer '{}'", task.pack_id, task.id, report.layer_name);
					tiled = true;
				}
				Err(error) => warn!("serving '{}/{}' untiled: {error:#}", task.pack_id, task.id),
			}
		}
		if !tiled {
			remove_stale(&tiles)?;
		}

		Ok(Completed {
			entry: task.entry(prepared.geometry_type),
			cache_entry: Some(CacheEntry {
				content_hash: task.content_hash.clone(),
				layer_id: task.id.clone(),
				geometry_type: prepared.geometry_type,
				style: prepared.style.clone(),
			}),
			style: prepared.style,
			transformed: prepared.reprojected,
			tiled,
			copied: false,
			transform_ran: true,
			tiler_ran,
		})
	}

	/// Rebuilds the catalog entry of a layer from its existing artifacts.
	fn refresh_layer(&self, task: &LayerTask) -> Result<Completed> {
		let geometry = task.geometry_output();
		ensure!(geometry.is_file(), "no artifact {geometry:?} to refresh from");
		let geometry_type = match task.known_geometry_type {
			Some(geometry_type) => geometry_type,
			None => read_geojson_file(&geometry)?.geometry_type(),
		};
		let style = self.style_for(task.style.as_deref(), geometry_type);
		Ok(Completed {
			entry: task.entry(geometry_type),
			style,
			cache_entry: None,
			transformed: false,
			tiled: false,
			copied: false,
			transform_ran: false,
			tiler_ran: false,
		})
	}

	fn copy_image(&self, task: &ImageTask) -> Result<Completed> {
		let file = task.output_file();
		let target = task.output_dir.join(&file);
		if self.metadata_only {
			ensure!(target.is_file(), "no artifact {target:?} to refresh from");
		} else {
			let bytes = fs::read(&task.source).with_context(|| format!("reading {:?}", task.source))?;
			fs::create_dir_all(&task.output_dir).with_context(|| format!("creating {:?}", task.output_dir))?;
			write_atomic(&target, &bytes)?;
		}

		let bounds = task.bounds_file.as_deref().and_then(|path| match read_json::<[f64; 4]>(path) {
			Ok(bounds) => Some(bounds),
			Err(error) => {
				warn!("ignoring image bounds: {error:#}");
				None
			}
		});

		let mut entry = LayerEntry::new(
			&task.id,
			&task.display_name,
			&task.source_file,
			LayerFormat::Image,
			GeometryType::Image,
		);
		entry.file = Some(file);
		entry.bounds = bounds;
		Ok(Completed {
			entry,
			style: StyleConfig::image(),
			cache_entry: None,
			transformed: false,
			tiled: false,
			copied: !self.metadata_only,
			transform_ran: false,
			tiler_ran: false,
		})
	}
}
