use std::f64::consts::PI;

const EARTH_RADIUS: f64 = 6378137.0;

/// Spherical Web Mercator (EPSG:3857) meters to degrees `(lon, lat)`.
pub fn web_mercator_to_lon_lat(x: f64, y: f64) -> (f64, f64) {
	let lon = (x / EARTH_RADIUS).to_degrees();
	let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
	(lon, lat)
}

/// Degrees to spherical Web Mercator meters.
pub fn lon_lat_to_web_mercator(lon: f64, lat: f64) -> (f64, f64) {
	let x = lon.to_radians() * EARTH_RADIUS;
	let y = (PI / 4.0 + lat.to_radians() / 2.0).tan().ln() * EARTH_RADIUS;
	(x, y)
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_abs_diff_eq;
	use rstest::rstest;

	#[rstest]
	#[case((0.0, 0.0), (0.0, 0.0))]
	#[case((20037508.342789244, 0.0), (180.0, 0.0))]
	#[case((1447153.38, 6891041.0), (13.0, 52.5))]
	fn to_degrees(#[case] meters: (f64, f64), #[case] degrees: (f64, f64)) {
		let (lon, lat) = web_mercator_to_lon_lat(meters.0, meters.1);
		assert_abs_diff_eq!(lon, degrees.0, epsilon = 1e-3);
		assert_abs_diff_eq!(lat, degrees.1, epsilon = 1e-3);
	}

	#[test]
	fn both_directions_agree() {
		let (x, y) = lon_lat_to_web_mercator(-122.4, 37.8);
		let (lon, lat) = web_mercator_to_lon_lat(x, y);
		assert_abs_diff_eq!(lon, -122.4, epsilon = 1e-9);
		assert_abs_diff_eq!(lat, 37.8, epsilon = 1e-9);
	}
}
