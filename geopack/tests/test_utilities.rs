#![allow(unused)]

use assert_cmd::{Command, cargo};
use assert_fs::{TempDir, prelude::*};
use serde_json::Value;
use std::path::Path;

pub const LINE_LAYER: &str = r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"NAME":"Herzl"},"geometry":{"type":"LineString","coordinates":[[34.78,32.08],[34.79,32.09]]}}]}"#;
pub const GRID_LAYER: &str = r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{},"geometry":{"type":"Polygon","coordinates":[[[178000,663000],[179000,663000],[179000,664000],[178000,663000]]]}}]}"#;
pub const POLYGON_STYLE: &str = r#"{
	"type": "CIMLayerDocument",
	"layerDefinitions": [{
		"type": "CIMFeatureLayer",
		"name": "parcels",
		"renderer": {
			"type": "CIMSimpleRenderer",
			"symbol": {"type": "CIMSymbolReference", "symbol": {
				"type": "CIMPolygonSymbol",
				"symbolLayers": [
					{"type": "CIMSolidStroke", "width": 1.5, "color": {"type": "CIMRGBColor", "values": [0, 0, 0, 100]}},
					{"type": "CIMSolidFill", "color": {"type": "CIMRGBColor", "values": [0, 128, 0, 100]}}
				]
			}}
		}
	}]
}"#;

/// Helper to create a Command for the geopack binary.
pub fn geopack_cmd() -> Command {
	Command::new(cargo::cargo_bin!())
}

/// Source directory with two packs: one healthy layer and a broken one in `transport`, a
/// styled layer in regional grid coordinates plus an image in `cadastre`, and a WMTS
/// declaration pack.
pub fn source_packs() -> TempDir {
	let dir = TempDir::new().expect("failed to create temp dir");
	dir.child("transport/gis/roads.geojson").write_str(LINE_LAYER).unwrap();
	dir.child("transport/gis/broken.geojson")
		.write_str("{\"type\": \"FeatureCollection\", \"features\": [")
		.unwrap();
	dir.child("cadastre/gis/parcels.geojson").write_str(GRID_LAYER).unwrap();
	dir.child("cadastre/styles/Parcels.lyrx").write_str(POLYGON_STYLE).unwrap();
	dir.child("cadastre/images/ortho.jpeg").write_binary(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
	dir.child("cadastre/images/ortho.bounds.json").write_str("[34.7, 32.0, 34.9, 32.2]").unwrap();
	dir.child("basemaps/wmts.config.json")
		.write_str(r#"[{"id": "topo", "displayName": "Topographic", "format": "wmts", "url": "https://tiles.example/{z}/{x}/{y}.png"}]"#)
		.unwrap();
	dir.child("popup-config.json")
		.write_str(r#"{"transport": {"layers": {"roads": {"fields": [{"label": "Name", "key": "NAME"}]}}}}"#)
		.unwrap();
	dir
}

pub fn build(source: &Path, output: &Path, extra: &[&str]) -> assert_cmd::assert::Assert {
	geopack_cmd()
		.arg("build")
		.arg("--source")
		.arg(source)
		.arg("--output")
		.arg(output)
		.args(extra)
		.assert()
}

pub fn read_json(path: &Path) -> Value {
	let text = std::fs::read_to_string(path).unwrap_or_else(|_| panic!("missing {path:?}"));
	serde_json::from_str(&text).unwrap()
}
