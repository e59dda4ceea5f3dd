//! Runs a whole build: enumerates every task of every pack, dispatches them onto a bounded
//! pool and folds the results into the cache and the manifests.
//!
//! Workers never touch shared state. Each finished task is handed back to the coordinator,
//! which alone records cache entries and catalog layers.

mod catalog;
mod ids;
mod plan;
mod task;
mod worker;

pub use catalog::{Catalog, reserved_ids};
pub use ids::IdAllocator;
pub use plan::{Plan, PlanContext};
pub use task::*;
pub use worker::Worker;

use crate::{
	config::GeopackConfig,
	manifest::{PopupCatalog, read_wmts_declarations},
	scan::{PackSource, scan_packs},
};
use anyhow::{Context, Result, anyhow, ensure};
use futures::{StreamExt, stream};
use geopack_core::LayerCache;
use log::{debug, error, info, warn};
use serde_json::Value;
use std::{fmt, fs, path::PathBuf, sync::Arc};

#[derive(Clone, Debug, Default)]
pub struct BuildOptions {
	pub source: PathBuf,
	pub output: PathBuf,
	/// reprocess every layer regardless of the cache
	pub no_cache: bool,
	/// rebuild manifests and styles from existing artifacts only
	pub metadata_only: bool,
	/// overrides the configured pool size
	pub workers: Option<usize>,
}

/// Counters of one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
	pub processed: usize,
	pub cached: usize,
	pub failed: usize,
	pub transformed: usize,
	pub tiled: usize,
	pub images_copied: usize,
	/// transformer runs, including canonical documents that are only copied
	pub transform_calls: usize,
	/// tiler runs, including failed ones
	pub tiling_calls: usize,
}

impl fmt::Display for RunReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} processed, {} cached, {} failed ({} reprojected, {} tiled, {} images copied)",
			self.processed, self.cached, self.failed, self.transformed, self.tiled, self.images_copied
		)
	}
}

/// One less than the number of CPUs, at least one.
pub fn default_workers() -> usize {
	num_cpus::get().saturating_sub(1).max(1)
}

/// Owns the cache and the catalog while tasks finish.
struct Coordinator {
	cache: LayerCache,
	catalog: Catalog,
	report: RunReport,
}

impl Coordinator {
	fn apply(&mut self, outcome: TaskOutcome) {
		let TaskOutcome {
			pack_id,
			description,
			cache_key,
			state,
			result,
		} = outcome;

		match result {
			Ok(completed) => {
				debug!("{description}: {state:?}");
				match state {
					TaskState::Cached => self.report.cached += 1,
					_ => self.report.processed += 1,
				}
				self.report.transformed += usize::from(completed.transformed);
				self.report.tiled += usize::from(completed.tiled);
				self.report.images_copied += usize::from(completed.copied);
				self.report.transform_calls += usize::from(completed.transform_ran);
				self.report.tiling_calls += usize::from(completed.tiler_ran);
				if let (Some(key), Some(entry)) = (cache_key, completed.cache_entry) {
					self.cache.record(key, entry);
				}
				self.catalog.add(&pack_id, completed.entry, completed.style);
			}
			Err(cause) => {
				error!("{description} failed: {cause:#}");
				self.report.failed += 1;
				if let Some(key) = cache_key {
					self.cache.remove(&key);
				}
			}
		}
	}
}

/// Collects the WMTS declarations of all packs in pack order. Unreadable files are skipped.
fn wmts_declarations(packs: &[PackSource]) -> Vec<Value> {
	let mut declarations = Vec::new();
	for pack in packs {
		if let Some(path) = &pack.wmts_config {
			match read_wmts_declarations(path) {
				Ok(mut values) => declarations.append(&mut values),
				Err(cause) => warn!("ignoring WMTS declarations of pack '{}': {cause:#}", pack.id),
			}
		}
	}
	declarations
}

async fn dispatch(worker: Arc<Worker>, task: Task) -> TaskOutcome {
	let pack_id = task.pack_id().to_string();
	let description = task.describe();
	let cache_key = task.cache_key().map(str::to_string);
	debug!("{description}: {:?} -> {:?}", TaskState::Pending, TaskState::Processing);

	let result = match tokio::spawn(worker.run(task)).await {
		Ok(result) => result,
		Err(cause) => Err(anyhow!("task panicked: {cause}")),
	};
	let state = if result.is_ok() {
		TaskState::Succeeded
	} else {
		TaskState::Failed
	};
	TaskOutcome {
		pack_id,
		description,
		cache_key,
		state,
		result,
	}
}

#[derive(Clone, Debug, Default)]
pub struct Orchestrator {
	config: GeopackConfig,
}

impl Orchestrator {
	pub fn new(config: GeopackConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &GeopackConfig {
		&self.config
	}

	pub async fn run(&self, options: &BuildOptions) -> Result<RunReport> {
		let config = &self.config;
		ensure!(options.source.is_dir(), "source directory {:?} does not exist", options.source);
		fs::create_dir_all(&options.output)
			.with_context(|| format!("creating output directory {:?}", options.output))?;

		let packs = scan_packs(&options.source, &config.conventions)?;
		info!("found {} packs in {:?}", packs.len(), options.source);

		let declarations = wmts_declarations(&packs);
		let reserved = reserved_ids(&config.base, &declarations);

		let cache = LayerCache::load(&options.output.join(&config.cache_file));
		let popups = PopupCatalog::load(&options.source.join(&config.conventions.popup_config));
		let plan = Plan::build(
			&packs,
			&PlanContext {
				output: &options.output,
				base_pack: &config.base.id,
				reserved_ids: &reserved,
				conventions: &config.conventions,
				cache: &cache,
				popups: &popups,
				no_cache: options.no_cache,
				metadata_only: options.metadata_only,
			},
		);

		let mut coordinator = Coordinator {
			cache,
			catalog: Catalog::default(),
			report: RunReport::default(),
		};
		for outcome in plan.cached.into_iter().chain(plan.failed) {
			coordinator.apply(outcome);
		}

		let workers = options.workers.or(config.workers).unwrap_or_else(default_workers).max(1);
		info!("processing {} tasks with {workers} workers", plan.tasks.len());
		let worker = Arc::new(Worker::new(config, options.metadata_only));
		let mut outcomes = stream::iter(plan.tasks)
			.map(|task| dispatch(Arc::clone(&worker), task))
			.buffer_unordered(workers);
		while let Some(outcome) = outcomes.next().await {
			coordinator.apply(outcome);
		}

		let Coordinator {
			mut cache,
			catalog,
			report,
		} = coordinator;
		catalog.write(&options.output, &config.base, declarations)?;

		if !options.metadata_only {
			cache.retain_keys(&plan.layer_keys);
			if let Err(cause) = cache.save() {
				warn!("cannot save the layer cache: {cause:#}");
			}
		}

		info!("{report}");
		Ok(report)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::manifest::RootManifest;
	use assert_fs::{TempDir, prelude::*};
	use geopack_core::json::read_json;
	use pretty_assertions::assert_eq;
	use std::path::Path;

	const LINE: &str = r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"NAME":"a"},"geometry":{"type":"LineString","coordinates":[[34.78,32.08],[34.79,32.09]]}}]}"#;
	const GRID: &str = r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[178000,663000]}}]}"#;

	fn source() -> TempDir {
		let source = TempDir::new().unwrap();
		source.child("transport/gis/roads.geojson").write_str(LINE).unwrap();
		source.child("transport/gis/broken.geojson").write_str("{\"type\":").unwrap();
		source.child("sites/sites.geojson").write_str(GRID).unwrap();
		source.child("sites/images/plan.png").write_binary(b"\x89PNG").unwrap();
		source
			.child("basemaps/wmts.config.json")
			.write_str(r#"[{"id": "topo", "format": "wmts", "url": "https://tiles/{z}/{x}/{y}.png"}]"#)
			.unwrap();
		source
	}

	fn options(source: &Path, output: &Path) -> BuildOptions {
		BuildOptions {
			source: source.to_path_buf(),
			output: output.to_path_buf(),
			workers: Some(2),
			..BuildOptions::default()
		}
	}

	fn read(path: &Path) -> Vec<u8> {
		fs::read(path).unwrap()
	}

	#[tokio::test]
	async fn full_run_then_cached_rerun() -> Result<()> {
		let source = source();
		let output = TempDir::new()?;
		let orchestrator = Orchestrator::default();
		let options = options(source.path(), output.path());

		let report = orchestrator.run(&options).await?;
		assert_eq!(report.processed, 3);
		assert_eq!(report.failed, 1);
		assert_eq!(report.transformed, 1);
		assert_eq!(report.transform_calls, 2);
		assert_eq!(report.images_copied, 1);

		let root: RootManifest = read_json(&output.path().join("layers-manifest.json"))?;
		assert_eq!(root.packs, vec!["base", "sites", "transport"]);
		let transport: Value = read_json(&output.path().join("transport/manifest.json"))?;
		assert_eq!(transport["layers"].as_array().unwrap().len(), 1);
		assert_eq!(transport["layers"][0]["id"], "roads");
		let base: Value = read_json(&output.path().join("base/manifest.json"))?;
		assert_eq!(base["layers"][1]["id"], "topo");
		assert!(output.path().join("sites/plan.png").is_file());

		let manifest = read(&output.path().join("transport/manifest.json"));
		let styles = read(&output.path().join("sites/styles.json"));
		let cache = read(&output.path().join(".layer-cache.json"));

		let report = orchestrator.run(&options).await?;
		assert_eq!(report.cached, 2);
		assert_eq!(report.failed, 1);
		assert_eq!(report.transformed, 0);
		assert_eq!(report.transform_calls, 0);
		assert_eq!(report.tiling_calls, 0);
		assert_eq!(read(&output.path().join("transport/manifest.json")), manifest);
		assert_eq!(read(&output.path().join("sites/styles.json")), styles);
		assert_eq!(read(&output.path().join(".layer-cache.json")), cache);
		Ok(())
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn tiled_layers_stay_tiled_when_cached() -> Result<()> {
		use std::os::unix::fs::PermissionsExt;

		let source = source();
		let output = TempDir::new()?;
		let tools = TempDir::new()?;
		let tippecanoe = tools.child("fake-tippecanoe");
		tippecanoe.write_str("#!/bin/sh\necho mbtiles > tiles.mbtiles\n")?;
		let pmtiles = tools.child("fake-pmtiles");
		pmtiles.write_str("#!/bin/sh\ncp \"$2\" \"$3\"\n")?;
		for tool in [&tippecanoe, &pmtiles] {
			fs::set_permissions(tool.path(), fs::Permissions::from_mode(0o755))?;
		}

		let mut config = GeopackConfig::default();
		config.tiling.size_threshold_bytes = 0;
		config.tiling.in_process_limit_bytes = 0;
		config.tiling.tippecanoe = tippecanoe.path().to_string_lossy().into_owned();
		config.tiling.pmtiles = pmtiles.path().to_string_lossy().into_owned();
		let orchestrator = Orchestrator::new(config);
		let options = options(source.path(), output.path());

		let report = orchestrator.run(&options).await?;
		assert_eq!(report.tiling_calls, 2);
		assert_eq!(report.tiled, 2);
		let manifest = read(&output.path().join("transport/manifest.json"));
		let transport: Value = serde_json::from_slice(&manifest)?;
		assert_eq!(transport["layers"][0]["tiledFileRef"], "roads.pmtiles");

		let report = orchestrator.run(&options).await?;
		assert_eq!(report.cached, 2);
		assert_eq!(report.transform_calls, 0);
		assert_eq!(report.tiling_calls, 0);
		assert_eq!(read(&output.path().join("transport/manifest.json")), manifest);
		assert!(output.path().join("sites/sites.pmtiles").is_file());
		Ok(())
	}

	#[tokio::test]
	async fn surviving_source_replaces_artifact_of_vanished_one() -> Result<()> {
		let source = TempDir::new()?;
		source
			.child("p/gis/roads.geojson")
			.write_str(r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{},"geometry":{"type":"Polygon","coordinates":[[[34.7,32.0],[34.8,32.0],[34.8,32.1],[34.7,32.0]]]}}]}"#)?;
		source.child("p/roads.json").write_str(LINE)?;
		let output = TempDir::new()?;
		let orchestrator = Orchestrator::default();
		let options = options(source.path(), output.path());

		orchestrator.run(&options).await?;
		fs::remove_file(source.path().join("p/gis/roads.geojson"))?;
		let report = orchestrator.run(&options).await?;
		assert_eq!(report.cached, 0);
		assert_eq!(report.transform_calls, 1);

		let manifest: Value = read_json(&output.path().join("p/manifest.json"))?;
		assert_eq!(manifest["layers"][0]["id"], "roads");
		assert_eq!(manifest["layers"][0]["geometryType"], "line");
		assert_eq!(read(&output.path().join("p/roads.geojson")), LINE.as_bytes());

		let report = orchestrator.run(&options).await?;
		assert_eq!(report.cached, 1);
		Ok(())
	}

	#[tokio::test]
	async fn base_layers_do_not_collide_with_satellite_or_declarations() -> Result<()> {
		let source = TempDir::new()?;
		source.child("base/satellite.geojson").write_str(LINE)?;
		source.child("base/topo.geojson").write_str(LINE)?;
		source
			.child("base/wmts.config.json")
			.write_str(r#"[{"id": "satellite", "format": "wmts"}, {"id": "topo", "format": "wmts"}]"#)?;
		let output = TempDir::new()?;
		Orchestrator::default().run(&options(source.path(), output.path())).await?;

		let manifest: Value = read_json(&output.path().join("base/manifest.json"))?;
		let ids: Vec<&str> = manifest["layers"]
			.as_array()
			.unwrap()
			.iter()
			.map(|layer| layer["id"].as_str().unwrap())
			.collect();
		assert_eq!(ids, vec!["satellite", "satellite_2", "topo_2", "topo"]);
		assert!(output.path().join("base/satellite_2.geojson").is_file());
		Ok(())
	}

	#[tokio::test]
	async fn metadata_only_uses_existing_artifacts() -> Result<()> {
		let source = source();
		let output = TempDir::new()?;
		let orchestrator = Orchestrator::default();
		orchestrator.run(&options(source.path(), output.path())).await?;
		let geometry = read(&output.path().join("sites/sites.geojson"));

		source.child("transport/styles/roads.lyrx").write_str("not a style")?;
		let report = orchestrator
			.run(&BuildOptions {
				metadata_only: true,
				..options(source.path(), output.path())
			})
			.await?;
		assert_eq!(report.transformed, 0);
		assert_eq!(report.images_copied, 0);
		assert_eq!(report.cached, 0);
		assert_eq!(read(&output.path().join("sites/sites.geojson")), geometry);
		let styles: Value = read_json(&output.path().join("transport/styles.json"))?;
		assert_eq!(styles["roads"]["fallback"], true);
		Ok(())
	}

	#[tokio::test]
	async fn missing_source_aborts() {
		let output = TempDir::new().unwrap();
		let options = options(Path::new("/nonexistent/geopack/source"), output.path());
		assert!(Orchestrator::default().run(&options).await.is_err());
	}

	#[test]
	fn report_display() {
		let report = RunReport {
			processed: 3,
			cached: 2,
			failed: 1,
			transformed: 1,
			tiled: 0,
			images_copied: 1,
			transform_calls: 3,
			tiling_calls: 0,
		};
		assert_eq!(
			report.to_string(),
			"3 processed, 2 cached, 1 failed (1 reprojected, 0 tiled, 1 images copied)"
		);
		assert!(default_workers() >= 1);
	}
}
