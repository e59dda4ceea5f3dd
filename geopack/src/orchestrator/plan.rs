use super::{
	IdAllocator,
	task::{Completed, ImageTask, LayerTask, Task, TaskOutcome, TaskState},
};
use crate::{config::Conventions, manifest::PopupCatalog, scan::PackSource};
use geopack_core::{LayerCache, content_hash, display_name_from_stem};
use geopack_style::StyleIndex;
use log::{debug, error};
use std::{collections::HashSet, path::Path};

pub struct PlanContext<'a> {
	pub output: &'a Path,
	pub base_pack: &'a str,
	/// ids in the base pack taken by the satellite layer and WMTS declarations
	pub reserved_ids: &'a [String],
	pub conventions: &'a Conventions,
	pub cache: &'a LayerCache,
	pub popups: &'a PopupCatalog,
	pub no_cache: bool,
	pub metadata_only: bool,
}

/// Every task of a run, enumerated across all packs before anything is dispatched.
#[derive(Debug, Default)]
pub struct Plan {
	pub tasks: Vec<Task>,
	/// layers whose cached result is still valid
	pub cached: Vec<TaskOutcome>,
	/// layers that could not even be enumerated
	pub failed: Vec<TaskOutcome>,
	/// cache keys of all geometry documents seen
	pub layer_keys: HashSet<String>,
}

fn stem_of(path: &Path) -> String {
	path.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default()
}

impl Plan {
	pub fn build(packs: &[PackSource], context: &PlanContext) -> Plan {
		let mut plan = Plan::default();
		for pack in packs {
			plan.add_pack(pack, context);
		}
		debug!(
			"planned {} tasks, {} cached, {} failed",
			plan.tasks.len(),
			plan.cached.len(),
			plan.failed.len()
		);
		plan
	}

	fn add_pack(&mut self, pack: &PackSource, context: &PlanContext) {
		let styles = StyleIndex::build(&pack.style_files);
		let output_dir = context.output.join(&pack.id);
		let mut ids = IdAllocator::default();
		if pack.id == context.base_pack {
			for id in context.reserved_ids {
				ids.reserve(id);
			}
		}

		for source in &pack.geometry_files {
			let stem = stem_of(source);
			let id = ids.allocate(&stem);
			let style = styles.lookup(&stem).map(|(path, kind)| {
				debug!("layer '{}/{id}' uses style {path:?} ({kind:?})", pack.id);
				path.to_path_buf()
			});
			let source_file = pack.relative(source);
			let cache_key = LayerCache::key(&pack.id, &source_file);
			self.layer_keys.insert(cache_key.clone());

			let mut task = LayerTask {
				pack_id: pack.id.clone(),
				id,
				display_name: display_name_from_stem(&stem),
				source: source.clone(),
				source_file,
				popup: context.popups.lookup(&pack.id, &stem),
				style,
				content_hash: String::new(),
				cache_key,
				output_dir: output_dir.clone(),
				known_geometry_type: None,
			};

			if context.metadata_only {
				task.known_geometry_type = context
					.cache
					.get(&task.cache_key)
					.filter(|entry| entry.layer_id == task.id)
					.map(|entry| entry.geometry_type);
				self.tasks.push(Task::Layer(task));
				continue;
			}

			let hashed: Vec<&Path> = [Some(task.source.as_path()), task.style.as_deref()].into_iter().flatten().collect();
			task.content_hash = match content_hash(&hashed) {
				Ok(hash) => hash,
				Err(error) => {
					error!("cannot read layer '{}/{}': {error:#}", task.pack_id, task.source_file);
					self.failed.push(TaskOutcome {
						pack_id: task.pack_id.clone(),
						description: Task::Layer(task.clone()).describe(),
						cache_key: Some(task.cache_key.clone()),
						state: TaskState::Failed,
						result: Err(error),
					});
					continue;
				}
			};

			match Self::cached_outcome(&task, context) {
				Some(outcome) => self.cached.push(outcome),
				None => self.tasks.push(Task::Layer(task)),
			}
		}

		for source in &pack.images {
			let stem = stem_of(source);
			let image_dir = source.parent().map(Path::to_path_buf).unwrap_or_default();
			let bounds_file = image_dir.join(format!("{stem}{}", context.conventions.bounds_suffix));
			self.tasks.push(Task::Image(ImageTask {
				pack_id: pack.id.clone(),
				id: ids.allocate(&stem),
				display_name: display_name_from_stem(&stem),
				source: source.clone(),
				source_file: pack.relative(source),
				bounds_file: bounds_file.is_file().then_some(bounds_file),
				output_dir: output_dir.clone(),
			}));
		}
	}

	/// The result recorded by an earlier run, if the inputs are unchanged and its artifact is
	/// still in place.
	fn cached_outcome(task: &LayerTask, context: &PlanContext) -> Option<TaskOutcome> {
		if context.cache.is_needed(&task.cache_key, &task.content_hash, &task.id, context.no_cache) {
			return None;
		}
		let cached = context.cache.get(&task.cache_key)?;
		if !task.geometry_output().is_file() {
			debug!("artifact of '{}/{}' is gone, processing again", task.pack_id, task.id);
			return None;
		}
		Some(TaskOutcome {
			pack_id: task.pack_id.clone(),
			description: Task::Layer(task.clone()).describe(),
			cache_key: Some(task.cache_key.clone()),
			state: TaskState::Cached,
			result: Ok(Completed {
				entry: task.entry(cached.geometry_type),
				style: cached.style.clone(),
				cache_entry: Some(cached.clone()),
				transformed: false,
				tiled: false,
				copied: false,
				transform_ran: false,
				tiler_ran: false,
			}),
		})
	}
}
