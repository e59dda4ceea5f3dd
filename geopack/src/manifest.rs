//! The catalog files: per-pack manifests and style catalogs, the root pack index, plus the
//! inputs merged into them (popup definitions and WMTS declarations).

use anyhow::{Context, Result, bail};
use geopack_core::{LayerEntry, NameIndex, PopupConfig, StyleConfig, json::read_json, json::write_json_pretty};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, path::Path};

pub const ROOT_MANIFEST: &str = "layers-manifest.json";
pub const PACK_MANIFEST: &str = "manifest.json";
pub const STYLE_CATALOG: &str = "styles.json";

/// A layer of a pack manifest: either produced here or declared in a WMTS file and copied
/// unchanged.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ManifestLayer {
	Entry(LayerEntry),
	Declared(Value),
}

impl ManifestLayer {
	pub fn id(&self) -> &str {
		match self {
			ManifestLayer::Entry(entry) => &entry.id,
			ManifestLayer::Declared(value) => value.get("id").and_then(Value::as_str).unwrap_or_default(),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PackManifest {
	pub id: String,
	pub name: String,
	pub layers: Vec<ManifestLayer>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RootManifest {
	pub packs: Vec<String>,
}

/// Writes `<pack>/manifest.json` and `<pack>/styles.json` below `output`.
pub fn write_pack(output: &Path, manifest: &PackManifest, styles: &BTreeMap<String, StyleConfig>) -> Result<()> {
	let dir = output.join(&manifest.id);
	std::fs::create_dir_all(&dir).with_context(|| format!("creating pack directory {dir:?}"))?;
	write_json_pretty(&dir.join(PACK_MANIFEST), manifest)?;
	write_json_pretty(&dir.join(STYLE_CATALOG), styles)?;
	debug!("wrote manifest of pack '{}' with {} layers", manifest.id, manifest.layers.len());
	Ok(())
}

pub fn write_root(output: &Path, manifest: &RootManifest) -> Result<()> {
	write_json_pretty(&output.join(ROOT_MANIFEST), manifest)
}

/// Reads the layer declarations of a `wmts.config.json`: a list of layer objects, or a single
/// one. Each declaration needs an `id`.
pub fn read_wmts_declarations(path: &Path) -> Result<Vec<Value>> {
	let declarations = match read_json::<Value>(path)? {
		Value::Array(values) => values,
		value @ Value::Object(_) => vec![value],
		_ => bail!("{path:?} holds neither a layer declaration nor a list of them"),
	};
	for declaration in &declarations {
		if declaration.get("id").and_then(Value::as_str).is_none() {
			bail!("declaration without an 'id' in {path:?}");
		}
	}
	Ok(declarations)
}

#[derive(Debug, Default, Deserialize)]
struct PackPopups {
	#[serde(default)]
	layers: BTreeMap<String, PopupConfig>,
}

/// Popup definitions of `popup-config.json`, keyed by pack and layer.
#[derive(Debug, Default)]
pub struct PopupCatalog {
	packs: NameIndex<String>,
	layers: BTreeMap<String, NameIndex<PopupConfig>>,
}

impl PopupCatalog {
	/// Loads the catalog. A missing file gives an empty catalog, a broken one an empty catalog
	/// and a warning.
	pub fn load(path: &Path) -> Self {
		if !path.is_file() {
			return Self::default();
		}
		match read_json::<BTreeMap<String, PackPopups>>(path) {
			Ok(document) => Self::from_document(document),
			Err(error) => {
				warn!("ignoring popup definitions: {error:#}");
				Self::default()
			}
		}
	}

	fn from_document(document: BTreeMap<String, PackPopups>) -> Self {
		let mut catalog = Self::default();
		for (pack, popups) in document {
			catalog.packs.insert(&pack, pack.clone());
			let mut index = NameIndex::new();
			for (layer, popup) in popups.layers {
				index.insert(&layer, popup);
			}
			catalog.layers.insert(pack, index);
		}
		catalog
	}

	/// The popup of `layer` in `pack`, matched by the same fuzzy rule as style documents.
	pub fn lookup(&self, pack: &str, layer: &str) -> Option<PopupConfig> {
		let key = self.packs.get(pack)?;
		self.layers.get(key)?.get(layer).cloned()
	}
}
