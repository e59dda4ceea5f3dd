use crate::{GeometryType, StyleConfig, json::write_json_pretty};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
	collections::{BTreeMap, HashSet},
	fs,
	path::{Path, PathBuf},
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
	pub content_hash: String,
	/// id the artifacts were written under; ids shift when colliding sources come and go
	#[serde(default)]
	pub layer_id: String,
	pub geometry_type: GeometryType,
	pub style: StyleConfig,
}

/// The persisted cache map.
///
/// Only the coordinating thread owns a `LayerCache`; workers never touch it. It is written once,
/// at the end of a run, so an interrupted run leaves the previous file intact.
#[derive(Debug)]
pub struct LayerCache {
	path: PathBuf,
	entries: BTreeMap<String, CacheEntry>,
}

impl LayerCache {
	/// Builds the key of a source file: `"pack/filename"`.
	pub fn key(pack: &str, file_name: &str) -> String {
		format!("{pack}/{file_name}")
	}

	pub fn new_empty(path: &Path) -> Self {
		Self {
			path: path.to_path_buf(),
			entries: BTreeMap::new(),
		}
	}

	/// Loads the cache file. A missing file gives an empty cache, an unreadable or corrupt one
	/// an empty cache plus a warning.
	pub fn load(path: &Path) -> Self {
		if !path.exists() {
			log::debug!("no layer cache at {path:?}, starting cold");
			return Self::new_empty(path);
		}

		match Self::read_entries(path) {
			Ok(entries) => {
				log::debug!("loaded {} cache entries from {path:?}", entries.len());
				Self {
					path: path.to_path_buf(),
					entries,
				}
			}
			Err(error) => {
				log::warn!("ignoring layer cache {path:?}: {error:#}");
				Self::new_empty(path)
			}
		}
	}

	fn read_entries(path: &Path) -> Result<BTreeMap<String, CacheEntry>> {
		let text = fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
		serde_json::from_str(&text).context("parsing cache entries")
	}

	/// Whether the layer behind `key` has to be processed again: caching is disabled, nothing is
	/// recorded, the inputs changed or the layer now has another id.
	pub fn is_needed(&self, key: &str, current_hash: &str, layer_id: &str, cache_disabled: bool) -> bool {
		if cache_disabled {
			return true;
		}
		match self.entries.get(key) {
			Some(entry) => entry.content_hash != current_hash || entry.layer_id != layer_id,
			None => true,
		}
	}

	pub fn get(&self, key: &str) -> Option<&CacheEntry> {
		self.entries.get(key)
	}

	pub fn record(&mut self, key: String, entry: CacheEntry) {
		self.entries.insert(key, entry);
	}

	pub fn remove(&mut self, key: &str) -> Option<CacheEntry> {
		self.entries.remove(key)
	}

	/// Drops all entries whose key is not in `keys`.
	pub fn retain_keys(&mut self, keys: &HashSet<String>) {
		self.entries.retain(|key, _| keys.contains(key));
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Writes the whole map at once, replacing the previous file atomically.
	pub fn save(&self) -> Result<()> {
		write_json_pretty(&self.path, &self.entries).with_context(|| format!("saving layer cache {:?}", self.path))?;
		log::debug!("saved {} cache entries to {:?}", self.entries.len(), self.path);
		Ok(())
	}
}
