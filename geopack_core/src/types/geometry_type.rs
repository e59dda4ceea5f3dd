use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of geometry a layer is drawn with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryType {
	Point,
	Line,
	Polygon,
	Image,
	#[default]
	Unknown,
}

impl GeometryType {
	/// Maps a GeoJSON geometry type name onto the catalog geometry type.
	pub fn from_geojson_type(name: &str) -> Self {
		match name {
			"Point" | "MultiPoint" => GeometryType::Point,
			"LineString" | "MultiLineString" => GeometryType::Line,
			"Polygon" | "MultiPolygon" => GeometryType::Polygon,
			_ => GeometryType::Unknown,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			GeometryType::Point => "point",
			GeometryType::Line => "line",
			GeometryType::Polygon => "polygon",
			GeometryType::Image => "image",
			GeometryType::Unknown => "unknown",
		}
	}
}

impl fmt::Display for GeometryType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("Point", GeometryType::Point)]
	#[case("MultiPoint", GeometryType::Point)]
	#[case("LineString", GeometryType::Line)]
	#[case("MultiLineString", GeometryType::Line)]
	#[case("Polygon", GeometryType::Polygon)]
	#[case("MultiPolygon", GeometryType::Polygon)]
	#[case("GeometryCollection", GeometryType::Unknown)]
	fn from_geojson(#[case] name: &str, #[case] expected: GeometryType) {
		assert_eq!(GeometryType::from_geojson_type(name), expected);
	}

	#[test]
	fn serializes_lowercase() {
		assert_eq!(serde_json::to_string(&GeometryType::Polygon).unwrap(), "\"polygon\"");
		let parsed: GeometryType = serde_json::from_str("\"line\"").unwrap();
		assert_eq!(parsed, GeometryType::Line);
	}
}
