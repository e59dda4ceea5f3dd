use crate::{
	TilingConfig, convert_mbtiles_to_pmtiles, should_tile,
	tools::{ScratchDir, ToolCommand},
};
use anyhow::{Context, Result, anyhow, ensure};
use geopack_core::Complexity;
use std::{
	fs,
	path::{Path, PathBuf},
};

/// How the MBTiles database was turned into PMTiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Conversion {
	InProcess,
	External,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TileReport {
	/// name of the vector layer inside the tiles
	pub layer_name: String,
	pub conversion: Conversion,
	pub size: u64,
}

/// The vector layer name for an output file: its stem with everything outside ASCII
/// alphanumerics replaced.
pub fn vector_layer_name(output: &Path) -> String {
	let stem = output.file_stem().map(|stem| stem.to_string_lossy()).unwrap_or_default();
	let name: String = stem
		.chars()
		.map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
		.collect();
	if name.trim_matches('_').is_empty() {
		String::from("layer")
	} else {
		name
	}
}

/// Produces PMTiles archives from GeoJSON documents with `tippecanoe` and `pmtiles`.
#[derive(Clone, Debug, Default)]
pub struct Tiler {
	config: TilingConfig,
	scratch_parent: Option<PathBuf>,
}

impl Tiler {
	pub fn new(config: TilingConfig) -> Self {
		Self {
			config,
			scratch_parent: None,
		}
	}

	/// Creates scratch directories inside `parent` instead of the system temporary directory.
	#[must_use]
	pub fn with_scratch_parent(mut self, parent: &Path) -> Self {
		self.scratch_parent = Some(parent.to_path_buf());
		self
	}

	pub fn config(&self) -> &TilingConfig {
		&self.config
	}

	pub fn should_tile(&self, source_size: u64, complexity: Complexity) -> bool {
		should_tile(source_size, complexity, &self.config)
	}

	/// Arguments of the `tippecanoe` call, relative to the scratch directory.
	pub fn tippecanoe_args(&self, layer_name: &str, high_fidelity: bool) -> Vec<String> {
		let mut args = vec![
			String::from("-o"),
			String::from(ScratchDir::MBTILES),
			String::from("--force"),
			format!("--minimum-zoom={}", self.config.min_zoom),
			format!("--maximum-zoom={}", self.config.max_zoom),
			format!("--layer={layer_name}"),
			String::from("--no-feature-limit"),
			String::from("--no-tile-size-limit"),
			String::from("--detect-shared-borders"),
		];
		if self.config.drop_densest {
			args.push(String::from("--drop-densest-as-needed"));
		}
		if high_fidelity {
			args.push(String::from("--no-line-simplification"));
			args.push(String::from("--no-tiny-polygon-reduction"));
		}
		args.push(String::from(ScratchDir::INPUT));
		args
	}

	/// Tiles `geojson` into the PMTiles archive `output`.
	///
	/// The scratch directory is removed whatever happens; `output` is only touched once the
	/// archive is complete.
	pub async fn tile(&self, geojson: &Path, output: &Path, high_fidelity: bool) -> Result<TileReport> {
		ensure!(
			self.config.min_zoom <= self.config.max_zoom,
			"minimum zoom {} is above maximum zoom {}",
			self.config.min_zoom,
			self.config.max_zoom
		);
		let scratch = ScratchDir::new(self.scratch_parent.as_deref())?;
		fs::copy(geojson, scratch.input()).with_context(|| format!("copying {geojson:?} into the scratch directory"))?;

		let layer_name = vector_layer_name(output);
		ToolCommand::new(&self.config.tippecanoe)
			.args(self.tippecanoe_args(&layer_name, high_fidelity))
			.current_dir(scratch.path())
			.timeout(self.config.tool_timeout())
			.run()
			.await
			.with_context(|| format!("tiling {geojson:?}"))?;

		let mbtiles_size = fs::metadata(scratch.mbtiles())
			.with_context(|| format!("{} produced no {}", self.config.tippecanoe, ScratchDir::MBTILES))?
			.len();

		let conversion = if mbtiles_size <= self.config.in_process_limit_bytes {
			let (mbtiles, pmtiles) = (scratch.mbtiles(), scratch.pmtiles());
			tokio::task::spawn_blocking(move || convert_mbtiles_to_pmtiles(&mbtiles, &pmtiles))
				.await
				.map_err(|error| anyhow!("converter task failed: {error}"))?
				.context("converting MBTiles to PMTiles")?;
			Conversion::InProcess
		} else {
			ToolCommand::new(&self.config.pmtiles)
				.args(["convert", ScratchDir::MBTILES, ScratchDir::PMTILES])
				.current_dir(scratch.path())
				.timeout(self.config.tool_timeout())
				.run()
				.await
				.context("converting MBTiles to PMTiles")?;
			Conversion::External
		};

		let size = move_into_place(&scratch.pmtiles(), output)?;
		log::debug!("tiled {geojson:?} into {output:?} ({size} bytes, {conversion:?} conversion)");
		Ok(TileReport {
			layer_name,
			conversion,
			size,
		})
	}
}

/// Moves `from` to `to`, copying when both are on different file systems.
fn move_into_place(from: &Path, to: &Path) -> Result<u64> {
	let size = fs::metadata(from)
		.with_context(|| format!("conversion produced no {}", ScratchDir::PMTILES))?
		.len();
	if let Some(parent) = to.parent() {
		fs::create_dir_all(parent).with_context(|| format!("creating {parent:?}"))?;
	}
	if fs::rename(from, to).is_err() {
		fs::copy(from, to).with_context(|| format!("copying tiles to {to:?}"))?;
	}
	Ok(size)
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_fs::{TempDir, prelude::*};
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	#[rstest]
	#[case("out/roads.pmtiles", "roads")]
	#[case("out/main roads.pmtiles", "main_roads")]
	#[case("out/כבישים.pmtiles", "layer")]
	#[case("out/zone-7.pmtiles", "zone-7")]
	fn layer_names(#[case] output: &str, #[case] expected: &str) {
		assert_eq!(vector_layer_name(Path::new(output)), expected);
	}

	#[test]
	fn tippecanoe_arguments() {
		let tiler = Tiler::new(TilingConfig {
			min_zoom: 6,
			max_zoom: 15,
			..TilingConfig::default()
		});
		let args = tiler.tippecanoe_args("roads", false);
		assert_eq!(args[0..3], ["-o", "tiles.mbtiles", "--force"]);
		assert!(args.contains(&String::from("--minimum-zoom=6")));
		assert!(args.contains(&String::from("--maximum-zoom=15")));
		assert!(args.contains(&String::from("--layer=roads")));
		assert!(args.contains(&String::from("--drop-densest-as-needed")));
		assert!(!args.contains(&String::from("--no-line-simplification")));
		assert_eq!(args.last().map(String::as_str), Some("input.geojson"));

		let tiler = Tiler::new(TilingConfig {
			drop_densest: false,
			..TilingConfig::default()
		});
		let args = tiler.tippecanoe_args("roads", true);
		assert!(!args.contains(&String::from("--drop-densest-as-needed")));
		assert!(args.contains(&String::from("--no-line-simplification")));
		assert!(args.contains(&String::from("--no-tiny-polygon-reduction")));
	}

	#[tokio::test]
	async fn missing_tool_is_an_error() -> Result<()> {
		let dir = TempDir::new()?;
		let input = dir.child("roads.geojson");
		input.write_str(r#"{"type":"FeatureCollection","features":[]}"#)?;
		let scratch = dir.child("scratch");
		scratch.create_dir_all()?;

		let tiler = Tiler::new(TilingConfig {
			tippecanoe: String::from("geopack-missing-tippecanoe"),
			..TilingConfig::default()
		})
		.with_scratch_parent(scratch.path());
		let output = dir.child("out/roads.pmtiles");
		assert!(tiler.tile(input.path(), output.path(), false).await.is_err());
		assert!(!output.path().exists());
		assert_eq!(fs::read_dir(scratch.path())?.count(), 0);
		Ok(())
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn runs_tools_in_scratch_directory() -> Result<()> {
		use std::os::unix::fs::PermissionsExt;

		let dir = TempDir::new()?;
		let input = dir.child("שכבה.geojson");
		input.write_str(r#"{"type":"FeatureCollection","features":[]}"#)?;

		// stand-ins that only check their input and create their output file
		let fake_tippecanoe = dir.child("fake-tippecanoe");
		fake_tippecanoe.write_str("#!/bin/sh\ntest -f input.geojson || exit 2\necho mbtiles > tiles.mbtiles\n")?;
		let fake_pmtiles = dir.child("fake-pmtiles");
		fake_pmtiles.write_str("#!/bin/sh\ntest \"$1\" = convert || exit 2\ncp \"$2\" \"$3\"\n")?;
		for tool in [&fake_tippecanoe, &fake_pmtiles] {
			fs::set_permissions(tool.path(), fs::Permissions::from_mode(0o755))?;
		}

		let tiler = Tiler::new(TilingConfig {
			tippecanoe: fake_tippecanoe.path().to_string_lossy().into_owned(),
			pmtiles: fake_pmtiles.path().to_string_lossy().into_owned(),
			in_process_limit_bytes: 0,
			..TilingConfig::default()
		});
		let output = dir.child("out/שכבה.pmtiles");
		let report = tiler.tile(input.path(), output.path(), true).await?;
		assert_eq!(report.conversion, Conversion::External);
		assert_eq!(report.layer_name, "layer");
		assert_eq!(fs::read_to_string(output.path())?, "mbtiles\n");
		Ok(())
	}
}
