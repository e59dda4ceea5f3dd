use super::{GeoCollection, GeoFeature, Geometry};
use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

/// Reads a GeoJSON document from a file. See [`read_geojson`].
pub fn read_geojson_file(path: &Path) -> Result<GeoCollection> {
	let file = File::open(path).with_context(|| format!("opening {path:?}"))?;
	read_geojson(BufReader::new(file)).with_context(|| format!("reading GeoJSON {path:?}"))
}

/// Reads a `FeatureCollection`, a single `Feature` or a bare geometry and returns it as a
/// collection. Every geometry is validated.
pub fn read_geojson(reader: impl Read) -> Result<GeoCollection> {
	let value: Value = serde_json::from_reader(reader).context("invalid JSON")?;
	let collection = parse_geojson_value(value)?;
	for (index, feature) in collection.features.iter().enumerate() {
		if let Some(geometry) = &feature.geometry {
			geometry.validate().with_context(|| format!("feature {index}"))?;
		}
	}
	Ok(collection)
}

pub fn parse_geojson_value(value: Value) -> Result<GeoCollection> {
	let object_type = value
		.get("type")
		.and_then(Value::as_str)
		.ok_or_else(|| anyhow!("GeoJSON object must have a 'type'"))?
		.to_string();

	Ok(match object_type.as_str() {
		"FeatureCollection" => serde_json::from_value(value).context("invalid FeatureCollection")?,
		"Feature" => GeoCollection::new(vec![serde_json::from_value(value).context("invalid Feature")?]),
		"Point" | "MultiPoint" | "LineString" | "MultiLineString" | "Polygon" | "MultiPolygon" | "GeometryCollection" => {
			let geometry: Geometry = serde_json::from_value(value).with_context(|| format!("invalid {object_type}"))?;
			GeoCollection::new(vec![GeoFeature::new(geometry)])
		}
		other => bail!("unknown GeoJSON type '{other}'"),
	})
}
