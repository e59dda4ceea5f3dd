use anyhow::{Result, ensure};
use geopack_core::GeometryType;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// One GeoJSON position: `[x, y]` or `[x, y, z]`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(pub Vec<f64>);

impl Position {
	pub fn new(x: f64, y: f64) -> Self {
		Self(vec![x, y])
	}

	pub fn x(&self) -> f64 {
		self.0.first().copied().unwrap_or(f64::NAN)
	}

	pub fn y(&self) -> f64 {
		self.0.get(1).copied().unwrap_or(f64::NAN)
	}

	pub fn is_valid(&self) -> bool {
		self.0.len() >= 2 && self.0[0].is_finite() && self.0[1].is_finite()
	}

	/// Replaces x and y, keeping any further ordinates.
	pub fn set_xy(&mut self, x: f64, y: f64) {
		self.0[0] = x;
		self.0[1] = y;
	}
}

impl Debug for Position {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(self.0.iter()).finish()
	}
}

impl From<[f64; 2]> for Position {
	fn from(value: [f64; 2]) -> Self {
		Self(value.to_vec())
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
	Point { coordinates: Position },
	MultiPoint { coordinates: Vec<Position> },
	LineString { coordinates: Vec<Position> },
	MultiLineString { coordinates: Vec<Vec<Position>> },
	Polygon { coordinates: Vec<Vec<Position>> },
	MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
	GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
	pub fn type_name(&self) -> &'static str {
		match self {
			Geometry::Point { .. } => "Point",
			Geometry::MultiPoint { .. } => "MultiPoint",
			Geometry::LineString { .. } => "LineString",
			Geometry::MultiLineString { .. } => "MultiLineString",
			Geometry::Polygon { .. } => "Polygon",
			Geometry::MultiPolygon { .. } => "MultiPolygon",
			Geometry::GeometryCollection { .. } => "GeometryCollection",
		}
	}

	pub fn geometry_type(&self) -> GeometryType {
		GeometryType::from_geojson_type(self.type_name())
	}

	/// Calls `f` for every position, depth first, in document order.
	pub fn for_each_position<F: FnMut(&Position)>(&self, f: &mut F) {
		match self {
			Geometry::Point { coordinates } => f(coordinates),
			Geometry::MultiPoint { coordinates } | Geometry::LineString { coordinates } => coordinates.iter().for_each(f),
			Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
				coordinates.iter().flatten().for_each(f);
			}
			Geometry::MultiPolygon { coordinates } => coordinates.iter().flatten().flatten().for_each(f),
			Geometry::GeometryCollection { geometries } => {
				for geometry in geometries {
					geometry.for_each_position(f);
				}
			}
		}
	}

	/// Calls `f` for every position and stops at the first error.
	pub fn try_for_each_position_mut<F: FnMut(&mut Position) -> Result<()>>(&mut self, f: &mut F) -> Result<()> {
		match self {
			Geometry::Point { coordinates } => f(coordinates),
			Geometry::MultiPoint { coordinates } | Geometry::LineString { coordinates } => {
				coordinates.iter_mut().try_for_each(f)
			}
			Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
				coordinates.iter_mut().flatten().try_for_each(f)
			}
			Geometry::MultiPolygon { coordinates } => coordinates.iter_mut().flatten().flatten().try_for_each(f),
			Geometry::GeometryCollection { geometries } => {
				geometries.iter_mut().try_for_each(|geometry| geometry.try_for_each_position_mut(f))
			}
		}
	}

	/// Checks that every position has at least two finite ordinates.
	pub fn validate(&self) -> Result<()> {
		let mut invalid = None;
		self.for_each_position(&mut |position| {
			if invalid.is_none() && !position.is_valid() {
				invalid = Some(position.clone());
			}
		});
		ensure!(invalid.is_none(), "invalid position {:?} in {}", invalid.unwrap_or(Position(vec![])), self.type_name());
		Ok(())
	}
}
