use crate::{
	mbtiles::MBTilesReader,
	pmtiles::{HeaderV3, PMTilesCompression, PMTilesType, PMTilesWriter, types::is_gzip},
};
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::{collections::BTreeMap, path::Path};

/// Parses a comma separated list of numbers, like the `bounds` and `center` metadata values.
fn parse_numbers(value: &str) -> Option<Vec<f64>> {
	value.split(',').map(|part| part.trim().parse::<f64>().ok()).collect()
}

/// The PMTiles metadata document: every metadata row as a string member, with the members of
/// the `json` row (vector layers, tile statistics) merged in.
pub fn metadata_json(metadata: &BTreeMap<String, String>) -> Result<Value> {
	let mut document = Map::new();
	for (name, value) in metadata {
		if name == "json" {
			let parsed: Map<String, Value> =
				serde_json::from_str(value).context("parsing the 'json' metadata row")?;
			document.extend(parsed);
		} else {
			document.insert(name.clone(), Value::String(value.clone()));
		}
	}
	Ok(Value::Object(document))
}

/// Converts an MBTiles database into a PMTiles v3 archive without external tools.
pub fn convert_mbtiles_to_pmtiles(mbtiles: &Path, pmtiles: &Path) -> Result<HeaderV3> {
	let reader = MBTilesReader::open(mbtiles)?;
	let metadata = reader.metadata()?;
	let tile_type = metadata
		.get("format")
		.map_or(PMTilesType::Mvt, |format| PMTilesType::from_mbtiles_format(format));

	let mut writer = PMTilesWriter::new(tile_type, PMTilesCompression::None);
	let mut gzipped = false;
	reader.for_each_tile(|tile| {
		gzipped |= is_gzip(&tile.data);
		writer.add_tile(tile.z, tile.x, tile.y, tile.data)
	})?;

	let header = writer.header_mut();
	if gzipped {
		header.tile_compression = PMTilesCompression::Gzip;
	}
	if let Some(bounds) = metadata.get("bounds").and_then(|value| parse_numbers(value))
		&& let [west, south, east, north] = bounds[..]
	{
		header.set_bounds([west, south, east, north]);
		header.set_center((west + east) / 2.0, (south + north) / 2.0, 0);
	}
	if let Some(center) = metadata.get("center").and_then(|value| parse_numbers(value))
		&& let [lon, lat, zoom] = center[..]
	{
		header.set_center(lon, lat, zoom.clamp(0.0, 31.0) as u8);
	}
	writer.set_metadata(metadata_json(&metadata)?);

	log::debug!("converting {} tiles from {mbtiles:?}", writer.tile_count());
	writer.write_path(pmtiles)
}
