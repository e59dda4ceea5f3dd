use anyhow::{Context, Result};
use flate2::{Compression, write::GzEncoder};
use std::io::Write;

/// Compression codes of the PMTiles v3 header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PMTilesCompression {
	Unknown = 0x0,
	None = 0x1,
	Gzip = 0x2,
	Brotli = 0x3,
	Zstd = 0x4,
}

/// Tile type codes of the PMTiles v3 header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PMTilesType {
	Unknown = 0x0,
	Mvt = 0x1,
	Png = 0x2,
	Jpeg = 0x3,
	Webp = 0x4,
	Avif = 0x5,
}

impl PMTilesType {
	/// Maps the `format` value of an MBTiles metadata table.
	pub fn from_mbtiles_format(format: &str) -> Self {
		match format.trim().to_ascii_lowercase().as_str() {
			"pbf" | "mvt" => PMTilesType::Mvt,
			"png" => PMTilesType::Png,
			"jpg" | "jpeg" => PMTilesType::Jpeg,
			"webp" => PMTilesType::Webp,
			"avif" => PMTilesType::Avif,
			_ => PMTilesType::Unknown,
		}
	}
}

/// Whether `bytes` start with the gzip magic number.
pub fn is_gzip(bytes: &[u8]) -> bool {
	bytes.starts_with(&[0x1F, 0x8B])
}

pub fn gzip(bytes: &[u8]) -> Result<Vec<u8>> {
	let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
	encoder.write_all(bytes).context("gzip compression")?;
	encoder.finish().context("finishing gzip stream")
}

#[cfg(test)]
pub fn gunzip(bytes: &[u8]) -> Result<Vec<u8>> {
	use std::io::Read;
	let mut decoded = Vec::new();
	flate2::read::GzDecoder::new(bytes).read_to_end(&mut decoded)?;
	Ok(decoded)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("pbf", PMTilesType::Mvt)]
	#[case("PNG", PMTilesType::Png)]
	#[case("jpg", PMTilesType::Jpeg)]
	#[case("webp", PMTilesType::Webp)]
	#[case("geojson", PMTilesType::Unknown)]
	fn mbtiles_formats(#[case] format: &str, #[case] expected: PMTilesType) {
		assert_eq!(PMTilesType::from_mbtiles_format(format), expected);
	}

	#[test]
	fn gzip_round_trip() -> Result<()> {
		let data = b"vector tile bytes".repeat(20);
		let compressed = gzip(&data)?;
		assert!(is_gzip(&compressed));
		assert!(compressed.len() < data.len());
		assert_eq!(gunzip(&compressed)?, data);
		assert!(!is_gzip(&data));
		Ok(())
	}
}
