use super::Geometry;
use anyhow::{Context, Result};
use geopack_core::GeometryType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
enum FeatureTag {
	#[default]
	Feature,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
enum FeatureCollectionTag {
	#[default]
	FeatureCollection,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoFeature {
	#[serde(rename = "type")]
	tag: FeatureTag,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<Value>,
	pub geometry: Option<Geometry>,
	#[serde(default)]
	pub properties: Option<Map<String, Value>>,
	#[serde(flatten)]
	pub foreign: Map<String, Value>,
}

impl GeoFeature {
	pub fn new(geometry: Geometry) -> Self {
		Self {
			tag: FeatureTag::Feature,
			id: None,
			geometry: Some(geometry),
			properties: Some(Map::new()),
			foreign: Map::new(),
		}
	}

	pub fn set_property(&mut self, key: &str, value: impl Into<Value>) {
		self.properties.get_or_insert_with(Map::new).insert(key.to_string(), value.into());
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoCollection {
	#[serde(rename = "type")]
	tag: FeatureCollectionTag,
	/// Legacy (2008 draft) coordinate reference member.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub crs: Option<Value>,
	pub features: Vec<GeoFeature>,
	#[serde(flatten)]
	pub foreign: Map<String, Value>,
}

impl GeoCollection {
	pub fn new(features: Vec<GeoFeature>) -> Self {
		Self {
			tag: FeatureCollectionTag::FeatureCollection,
			crs: None,
			features,
			foreign: Map::new(),
		}
	}

	/// The geometry type of the first feature that has a geometry.
	pub fn geometry_type(&self) -> GeometryType {
		self
			.features
			.iter()
			.find_map(|feature| feature.geometry.as_ref())
			.map(|geometry| geometry.geometry_type())
			.unwrap_or_default()
	}

	/// `[west, south, east, north]` over all valid positions, `None` if there are none.
	pub fn bounds(&self) -> Option<[f64; 4]> {
		let mut bounds: Option<[f64; 4]> = None;
		for geometry in self.features.iter().filter_map(|feature| feature.geometry.as_ref()) {
			geometry.for_each_position(&mut |position| {
				if !position.is_valid() {
					return;
				}
				let (x, y) = (position.x(), position.y());
				let b = bounds.get_or_insert([x, y, x, y]);
				b[0] = b[0].min(x);
				b[1] = b[1].min(y);
				b[2] = b[2].max(x);
				b[3] = b[3].max(y);
			});
		}
		bounds
	}

	pub fn to_json_vec(&self) -> Result<Vec<u8>> {
		serde_json::to_vec(self).context("serializing GeoJSON")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Position;
	use pretty_assertions::assert_eq;

	#[test]
	fn foreign_members_survive() -> Result<()> {
		let json = r#"{"type":"FeatureCollection","name":"roads","features":[{"type":"Feature","id":7,"geometry":null,"properties":{"a":1},"extra":true}]}"#;
		let collection: GeoCollection = serde_json::from_str(json)?;
		assert_eq!(collection.foreign.get("name"), Some(&Value::from("roads")));
		assert_eq!(collection.features[0].foreign.get("extra"), Some(&Value::Bool(true)));
		assert_eq!(collection.features[0].id, Some(Value::from(7)));

		let written: Value = serde_json::from_slice(&collection.to_json_vec()?)?;
		let original: Value = serde_json::from_str(json)?;
		assert_eq!(written, original);
		Ok(())
	}

	#[test]
	fn wrong_type_is_rejected() {
		let result = serde_json::from_str::<GeoCollection>(r#"{"type":"Feature","features":[]}"#);
		assert!(result.is_err());
	}

	#[test]
	fn geometry_type_from_first_geometry() {
		let mut empty = GeoFeature::new(Geometry::Point {
			coordinates: Position::new(0.0, 0.0),
		});
		empty.geometry = None;
		let line = GeoFeature::new(Geometry::LineString {
			coordinates: vec![Position::new(0.0, 0.0), Position::new(1.0, 1.0)],
		});
		let collection = GeoCollection::new(vec![empty, line]);
		assert_eq!(collection.geometry_type(), GeometryType::Line);
		assert_eq!(GeoCollection::new(vec![]).geometry_type(), GeometryType::Unknown);
	}

	#[test]
	fn bounds_cover_all_positions() {
		let mut feature = GeoFeature::new(Geometry::MultiPoint {
			coordinates: vec![Position::new(34.5, 31.0), Position::new(35.5, 32.5), Position::new(35.0, 29.5)],
		});
		feature.set_property("name", "x");
		let collection = GeoCollection::new(vec![feature]);
		assert_eq!(collection.bounds(), Some([34.5, 29.5, 35.5, 32.5]));
		assert_eq!(GeoCollection::new(vec![]).bounds(), None);
	}
}
