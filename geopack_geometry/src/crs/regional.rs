use super::{Ellipsoid, TransverseMercator, shift_datum};
use serde::Deserialize;

/// The projected grid assumed for documents that look projected but declare nothing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegionalProjection {
	/// EPSG code under which documents may declare this grid
	pub epsg: u32,
	pub projection: TransverseMercator,
	/// translation `[dx, dy, dz]` in meters from the grid's datum to WGS 84
	pub to_wgs84: [f64; 3],
	/// `[min_x, min_y, max_x, max_y]` of plausible grid coordinates
	pub envelope: [f64; 4],
}

impl Default for RegionalProjection {
	fn default() -> Self {
		Self {
			epsg: 2039,
			projection: TransverseMercator::ISRAEL_TM,
			to_wgs84: [-48.0, 55.0, 52.0],
			envelope: [90_000.0, 340_000.0, 330_000.0, 850_000.0],
		}
	}
}

impl RegionalProjection {
	pub fn contains(&self, x: f64, y: f64) -> bool {
		let [min_x, min_y, max_x, max_y] = self.envelope;
		x >= min_x && x <= max_x && y >= min_y && y <= max_y
	}

	/// Grid meters to WGS 84 degrees `(lon, lat)`.
	pub fn to_lon_lat(&self, x: f64, y: f64) -> (f64, f64) {
		let (lon, lat) = self.projection.inverse(x, y);
		if self.to_wgs84 == [0.0, 0.0, 0.0] && self.projection.ellipsoid == Ellipsoid::WGS84 {
			return (lon, lat);
		}
		shift_datum(lon, lat, &self.projection.ellipsoid, &Ellipsoid::WGS84, self.to_wgs84)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_abs_diff_eq;

	#[test]
	fn envelope_check() {
		let regional = RegionalProjection::default();
		assert!(regional.contains(219_529.0, 626_907.0));
		assert!(!regional.contains(35.2, 31.7));
		assert!(!regional.contains(3_900_000.0, 3_700_000.0));
	}

	#[test]
	fn false_origin_lands_near_the_grid_origin() {
		let regional = RegionalProjection::default();
		let (lon, lat) = regional.to_lon_lat(219_529.584, 626_907.39);
		// the datum shift moves the point by less than 100 m
		assert_abs_diff_eq!(lon, 35.2045169, epsilon = 1e-3);
		assert_abs_diff_eq!(lat, 31.7343936, epsilon = 1e-3);
	}

	#[test]
	fn deserialize_partial_config() {
		let regional: RegionalProjection = serde_json::from_str(r#"{"epsg": 2100}"#).unwrap();
		assert_eq!(regional.epsg, 2100);
		assert_eq!(regional.projection, TransverseMercator::ISRAEL_TM);
	}
}
