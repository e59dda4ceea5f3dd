mod test_utilities;
use assert_fs::TempDir;
use predicates::str;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use test_utilities::*;

#[test]
fn builds_catalog_and_skips_broken_layers() {
	let source = source_packs();
	let output = TempDir::new().unwrap();
	build(source.path(), output.path(), &["--workers", "2"])
		.success()
		.stdout(str::is_empty())
		.stderr(str::contains("3 processed, 0 cached, 1 failed (1 reprojected, 0 tiled, 1 images copied)"))
		.stderr(str::contains("broken.geojson"));

	let root = read_json(&output.path().join("layers-manifest.json"));
	assert_eq!(root, json!({"packs": ["base", "cadastre", "transport"]}));

	let transport = read_json(&output.path().join("transport/manifest.json"));
	assert_eq!(
		transport["layers"],
		json!([{
			"id": "roads",
			"displayName": "roads",
			"sourceFile": "gis/roads.geojson",
			"format": "geometry",
			"geometryType": "line",
			"file": "roads.geojson",
			"popupConfig": {"fields": [{"label": "Name", "key": "NAME"}]}
		}])
	);
	assert!(!output.path().join("transport/broken.geojson").exists());
	let styles = read_json(&output.path().join("transport/styles.json"));
	assert_eq!(styles["roads"]["fallback"], true);

	let cadastre = read_json(&output.path().join("cadastre/manifest.json"));
	assert_eq!(cadastre["layers"][0]["id"], "ortho");
	assert_eq!(cadastre["layers"][0]["file"], "ortho.jpg");
	assert_eq!(cadastre["layers"][0]["bounds"], json!([34.7, 32.0, 34.9, 32.2]));
	assert_eq!(cadastre["layers"][1]["id"], "parcels");
	assert_eq!(cadastre["layers"][1]["geometryType"], "polygon");
	assert_eq!(
		fs::read(output.path().join("cadastre/ortho.jpg")).unwrap(),
		vec![0xFF, 0xD8, 0xFF, 0xE0]
	);

	let styles = read_json(&output.path().join("cadastre/styles.json"));
	assert_eq!(styles["parcels"]["renderer"], "simple");
	assert_eq!(styles["parcels"]["defaultStyle"]["fillColor"], "#008000");
	assert!(styles["parcels"].get("fallback").is_none());
	assert_eq!(styles["ortho"]["renderer"], "image");

	let parcels = read_json(&output.path().join("cadastre/parcels.geojson"));
	let [lon, lat] = [
		parcels["features"][0]["geometry"]["coordinates"][0][0][0].as_f64().unwrap(),
		parcels["features"][0]["geometry"]["coordinates"][0][0][1].as_f64().unwrap(),
	];
	assert!((34.0..36.0).contains(&lon), "longitude {lon}");
	assert!((31.0..33.5).contains(&lat), "latitude {lat}");

	let base = read_json(&output.path().join("base/manifest.json"));
	assert_eq!(base["name"], "Base");
	assert_eq!(base["layers"][0]["id"], "satellite");
	assert_eq!(base["layers"][0]["format"], "wmts");
	assert_eq!(base["layers"][1]["id"], "topo");
	assert_eq!(base["layers"][1]["displayName"], "Topographic");
	assert!(output.path().join(".layer-cache.json").is_file());
}

#[test]
fn rerun_is_cached_and_byte_identical() {
	let source = source_packs();
	let output = TempDir::new().unwrap();
	build(source.path(), output.path(), &[]).success();

	let files = [
		"layers-manifest.json",
		"transport/manifest.json",
		"transport/styles.json",
		"cadastre/manifest.json",
		"cadastre/styles.json",
		"cadastre/parcels.geojson",
		"base/manifest.json",
		".layer-cache.json",
	];
	let before: Vec<Vec<u8>> = files.iter().map(|file| fs::read(output.path().join(file)).unwrap()).collect();

	build(source.path(), output.path(), &[])
		.success()
		.stderr(str::contains("1 processed, 2 cached, 1 failed"));

	for (file, bytes) in files.iter().zip(before) {
		assert_eq!(fs::read(output.path().join(file)).unwrap(), bytes, "{file} changed");
	}

	build(source.path(), output.path(), &["--no-cache"])
		.success()
		.stderr(str::contains("3 processed, 0 cached, 1 failed"));
}

#[test]
fn metadata_only_rebuilds_manifests_without_transforming() {
	let source = source_packs();
	let output = TempDir::new().unwrap();
	build(source.path(), output.path(), &[]).success();
	let parcels = fs::read(output.path().join("cadastre/parcels.geojson")).unwrap();

	// the source no longer parses, the artifact of the first run is used instead
	fs::write(source.path().join("cadastre/gis/parcels.geojson"), "garbage").unwrap();
	fs::remove_file(output.path().join("cadastre/manifest.json")).unwrap();

	build(source.path(), output.path(), &["--metadata-only"])
		.success()
		.stderr(str::contains("(0 reprojected, 0 tiled, 0 images copied)"));

	assert_eq!(fs::read(output.path().join("cadastre/parcels.geojson")).unwrap(), parcels);
	let cadastre = read_json(&output.path().join("cadastre/manifest.json"));
	assert_eq!(cadastre["layers"][1]["geometryType"], "polygon");
}

#[test]
fn changed_layer_is_processed_again() {
	let source = source_packs();
	let output = TempDir::new().unwrap();
	build(source.path(), output.path(), &[]).success();

	fs::write(
		source.path().join("transport/gis/roads.geojson"),
		LINE_LAYER.replace("Herzl", "Allenby"),
	)
	.unwrap();
	build(source.path(), output.path(), &[])
		.success()
		.stderr(str::contains("2 processed, 1 cached, 1 failed"));
	let roads = fs::read_to_string(output.path().join("transport/roads.geojson")).unwrap();
	assert!(roads.contains("Allenby"));
}
