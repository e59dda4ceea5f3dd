//! Transverse Mercator projection (series expansion after Snyder, "Map Projections – A Working
//! Manual", pp. 60–64). Accurate to well below a millimeter within a few degrees of the central
//! meridian, which covers national grids.

use super::Ellipsoid;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransverseMercator {
	pub ellipsoid: Ellipsoid,
	/// latitude of origin in degrees
	pub lat0: f64,
	/// central meridian in degrees
	pub lon0: f64,
	/// scale factor on the central meridian
	pub k0: f64,
	pub false_easting: f64,
	pub false_northing: f64,
}

impl TransverseMercator {
	/// Israeli Transverse Mercator grid (EPSG:2039) on GRS 80.
	pub const ISRAEL_TM: TransverseMercator = TransverseMercator {
		ellipsoid: Ellipsoid::GRS80,
		lat0: 31.734_393_611_111_1,
		lon0: 35.204_516_944_444_4,
		k0: 1.000_006_7,
		false_easting: 219_529.584,
		false_northing: 626_907.39,
	};

	fn e2(&self) -> f64 {
		self.ellipsoid.e2()
	}

	fn ep2(&self) -> f64 {
		let e2 = self.e2();
		e2 / (1.0 - e2)
	}

	/// Meridional arc length from the equator to latitude `phi` (radians).
	fn meridian_arc(&self, phi: f64) -> f64 {
		let e2 = self.e2();
		let e4 = e2 * e2;
		let e6 = e4 * e2;
		self.ellipsoid.a
			* ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
				- (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
				+ (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
				- (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
	}

	/// Projects geodetic degrees `(lon, lat)` to grid coordinates `(x, y)` in meters.
	pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
		let a = self.ellipsoid.a;
		let e2 = self.e2();
		let ep2 = self.ep2();
		let phi = lat.to_radians();
		let lambda = lon.to_radians();
		let lambda0 = self.lon0.to_radians();

		let n = a / (1.0 - e2 * phi.sin().powi(2)).sqrt();
		let t = phi.tan().powi(2);
		let c = ep2 * phi.cos().powi(2);
		let aa = (lambda - lambda0) * phi.cos();
		let m = self.meridian_arc(phi);
		let m0 = self.meridian_arc(self.lat0.to_radians());

		let x = self.false_easting
			+ self.k0
				* n * (aa + (1.0 - t + c) * aa.powi(3) / 6.0
				+ (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * aa.powi(5) / 120.0);
		let y = self.false_northing
			+ self.k0
				* (m - m0
					+ n * phi.tan()
						* (aa * aa / 2.0
							+ (5.0 - t + 9.0 * c + 4.0 * c * c) * aa.powi(4) / 24.0
							+ (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * aa.powi(6) / 720.0));
		(x, y)
	}

	/// Unprojects grid coordinates `(x, y)` in meters to geodetic degrees `(lon, lat)`.
	pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
		let a = self.ellipsoid.a;
		let e2 = self.e2();
		let ep2 = self.ep2();
		let e4 = e2 * e2;
		let e6 = e4 * e2;

		let m0 = self.meridian_arc(self.lat0.to_radians());
		let m = m0 + (y - self.false_northing) / self.k0;
		let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));
		let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

		let phi1 = mu
			+ (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
			+ (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
			+ (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
			+ (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

		let sin1 = phi1.sin();
		let cos1 = phi1.cos();
		let tan1 = phi1.tan();
		let c1 = ep2 * cos1 * cos1;
		let t1 = tan1 * tan1;
		let n1 = a / (1.0 - e2 * sin1 * sin1).sqrt();
		let r1 = a * (1.0 - e2) / (1.0 - e2 * sin1 * sin1).powf(1.5);
		let d = (x - self.false_easting) / (n1 * self.k0);

		let phi = phi1
			- (n1 * tan1 / r1)
				* (d * d / 2.0 - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
					+ (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1) * d.powi(6) / 720.0);
		let lambda = self.lon0.to_radians()
			+ (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
				+ (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1) * d.powi(5) / 120.0)
				/ cos1;

		(lambda.to_degrees(), phi.to_degrees())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_abs_diff_eq;
	use rstest::rstest;

	#[test]
	fn origin_maps_to_false_origin() {
		let tm = TransverseMercator::ISRAEL_TM;
		let (x, y) = tm.forward(tm.lon0, tm.lat0);
		assert_abs_diff_eq!(x, tm.false_easting, epsilon = 1e-6);
		assert_abs_diff_eq!(y, tm.false_northing, epsilon = 1e-6);

		let (lon, lat) = tm.inverse(tm.false_easting, tm.false_northing);
		assert_abs_diff_eq!(lon, tm.lon0, epsilon = 1e-7);
		assert_abs_diff_eq!(lat, tm.lat0, epsilon = 1e-7);
	}

	#[rstest]
	#[case(34.78, 32.08)]
	#[case(35.21, 31.77)]
	#[case(34.95, 29.55)]
	#[case(35.57, 33.2)]
	fn inverse_undoes_forward(#[case] lon: f64, #[case] lat: f64) {
		let tm = TransverseMercator::ISRAEL_TM;
		let (x, y) = tm.forward(lon, lat);
		let (lon2, lat2) = tm.inverse(x, y);
		assert_abs_diff_eq!(lon2, lon, epsilon = 1e-7);
		assert_abs_diff_eq!(lat2, lat, epsilon = 1e-7);
	}

	#[test]
	fn scale_is_close_to_one_near_the_meridian() {
		let tm = TransverseMercator::ISRAEL_TM;
		let (_, y1) = tm.forward(tm.lon0, 31.0);
		let (_, y2) = tm.forward(tm.lon0, 32.0);
		// one degree of latitude is about 110.9 km at this latitude
		assert_abs_diff_eq!(y2 - y1, 110_880.0, epsilon = 200.0);
	}
}
