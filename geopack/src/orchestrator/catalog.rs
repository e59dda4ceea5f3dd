use crate::{
	config::BasePackConfig,
	manifest::{ManifestLayer, PackManifest, RootManifest, write_pack, write_root},
};
use anyhow::Result;
use geopack_core::{GeometryType, LayerEntry, LayerFormat, StyleConfig, display_name_from_stem};
use log::{info, warn};
use serde_json::Value;
use std::{
	collections::{BTreeMap, HashSet},
	path::Path,
};

#[derive(Debug, Default)]
struct PackCatalog {
	entries: Vec<LayerEntry>,
	styles: BTreeMap<String, StyleConfig>,
}

/// Collects the finished layers of all packs and writes the manifests once the run is over.
#[derive(Debug, Default)]
pub struct Catalog {
	packs: BTreeMap<String, PackCatalog>,
}

fn satellite_entry(base: &BasePackConfig) -> LayerEntry {
	let satellite = &base.satellite;
	let mut entry = LayerEntry::new(
		&satellite.id,
		&satellite.display_name,
		"",
		LayerFormat::Wmts,
		GeometryType::Image,
	);
	entry.url = Some(satellite.url.clone());
	entry
}

fn declared_id(declaration: &Value) -> Option<&str> {
	declaration.get("id").and_then(Value::as_str)
}

/// Ids of the base pack that no source file may take: the satellite layer and every WMTS
/// declaration.
pub fn reserved_ids(base: &BasePackConfig, declarations: &[Value]) -> Vec<String> {
	let mut ids = vec![base.satellite.id.clone()];
	ids.extend(declarations.iter().filter_map(declared_id).map(str::to_string));
	ids
}

impl Catalog {
	pub fn add(&mut self, pack_id: &str, entry: LayerEntry, style: StyleConfig) {
		let pack = self.packs.entry(pack_id.to_string()).or_default();
		pack.styles.insert(entry.id.clone(), style);
		pack.entries.push(entry);
	}

	pub fn layer_count(&self) -> usize {
		self.packs.values().map(|pack| pack.entries.len()).sum()
	}

	/// Writes every pack manifest, style catalog and the root manifest.
	///
	/// Entries are sorted by id. The base pack always exists: it starts with the satellite
	/// entry and ends with the WMTS declarations of all packs.
	pub fn write(mut self, output: &Path, base: &BasePackConfig, declarations: Vec<Value>) -> Result<RootManifest> {
		self.packs.entry(base.id.clone()).or_default();

		let mut root = RootManifest::default();
		for (id, mut pack) in self.packs {
			pack.entries.sort_by(|a, b| a.id.cmp(&b.id));
			let is_base = id == base.id;
			if pack.entries.is_empty() && !is_base {
				continue;
			}

			let mut layers = Vec::with_capacity(pack.entries.len() + 1);
			let mut taken: HashSet<String> = pack.entries.iter().map(|entry| entry.id.clone()).collect();
			if is_base {
				let satellite = satellite_entry(base);
				if taken.insert(satellite.id.clone()) {
					pack.styles.insert(satellite.id.clone(), StyleConfig::image());
					layers.push(ManifestLayer::Entry(satellite));
				} else {
					warn!("layer '{}' of the base pack hides the satellite layer", satellite.id);
				}
			}
			layers.extend(pack.entries.into_iter().map(ManifestLayer::Entry));
			if is_base {
				for declaration in &declarations {
					match declared_id(declaration) {
						Some(id) if !taken.insert(id.to_string()) => {
							warn!("dropping WMTS declaration '{id}': the base pack already has a layer with that id");
						}
						_ => layers.push(ManifestLayer::Declared(declaration.clone())),
					}
				}
			}

			let manifest = PackManifest {
				name: if is_base { base.name.clone() } else { display_name_from_stem(&id) },
				id: id.clone(),
				layers,
			};
			write_pack(output, &manifest, &pack.styles)?;
			root.packs.push(id);
		}

		write_root(output, &root)?;
		info!("wrote manifests of {} packs to {output:?}", root.packs.len());
		Ok(root)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_fs::TempDir;
	use geopack_core::json::read_json;
	use pretty_assertions::assert_eq;
	use serde_json::json;

	fn entry(id: &str) -> LayerEntry {
		LayerEntry::new(id, id, &format!("gis/{id}.geojson"), LayerFormat::Geometry, GeometryType::Line)
	}

	#[test]
	fn writes_sorted_packs_and_base() -> Result<()> {
		let dir = TempDir::new()?;
		let mut catalog = Catalog::default();
		catalog.add("transport", entry("roads"), StyleConfig::fallback(GeometryType::Line));
		catalog.add("transport", entry("rail"), StyleConfig::fallback(GeometryType::Line));
		catalog.add("empty_pack", entry("ignored"), StyleConfig::fallback(GeometryType::Line));
		assert_eq!(catalog.layer_count(), 3);

		let base = BasePackConfig::default();
		let root = catalog.write(dir.path(), &base, vec![json!({"id": "topo", "format": "wmts"})])?;
		assert_eq!(root.packs, vec!["base", "empty_pack", "transport"]);

		let transport: Value = read_json(&dir.path().join("transport/manifest.json"))?;
		assert_eq!(transport["name"], "transport");
		assert_eq!(transport["layers"][0]["id"], "rail");
		assert_eq!(transport["layers"][1]["id"], "roads");

		let base_manifest: Value = read_json(&dir.path().join("base/manifest.json"))?;
		assert_eq!(base_manifest["name"], "Base");
		assert_eq!(base_manifest["layers"][0]["id"], "satellite");
		assert_eq!(base_manifest["layers"][0]["format"], "wmts");
		assert_eq!(base_manifest["layers"][1]["id"], "topo");
		let styles: Value = read_json(&dir.path().join("base/styles.json"))?;
		assert_eq!(styles["satellite"]["renderer"], "image");

		let written: RootManifest = read_json(&dir.path().join("layers-manifest.json"))?;
		assert_eq!(written, root);
		Ok(())
	}

	#[test]
	fn base_pack_ids_stay_unique() -> Result<()> {
		let dir = TempDir::new()?;
		let mut catalog = Catalog::default();
		catalog.add("base", entry("satellite_2"), StyleConfig::fallback(GeometryType::Line));
		let declarations = vec![
			json!({"id": "satellite", "format": "wmts"}),
			json!({"id": "topo", "format": "wmts"}),
			json!({"id": "topo", "format": "wmts", "url": "https://other"}),
			json!({"id": "satellite_2", "format": "wmts"}),
		];
		let base = BasePackConfig::default();
		assert_eq!(reserved_ids(&base, &declarations), vec!["satellite", "satellite", "topo", "topo", "satellite_2"]);
		catalog.write(dir.path(), &base, declarations)?;

		let manifest: Value = read_json(&dir.path().join("base/manifest.json"))?;
		let ids: Vec<&str> = manifest["layers"]
			.as_array()
			.unwrap()
			.iter()
			.map(|layer| layer["id"].as_str().unwrap())
			.collect();
		assert_eq!(ids, vec!["satellite", "satellite_2", "topo"]);
		let styles: Value = read_json(&dir.path().join("base/styles.json"))?;
		assert_eq!(styles["satellite"]["renderer"], "image");
		assert_eq!(styles["satellite_2"]["fallback"], true);
		Ok(())
	}

	#[test]
	fn base_pack_exists_without_layers() -> Result<()> {
		let dir = TempDir::new()?;
		let root = Catalog::default().write(dir.path(), &BasePackConfig::default(), Vec::new())?;
		assert_eq!(root.packs, vec!["base"]);
		assert!(dir.path().join("base/styles.json").is_file());
		Ok(())
	}
}
