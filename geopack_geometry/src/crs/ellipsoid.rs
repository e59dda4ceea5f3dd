use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ellipsoid {
	/// semi-major axis in meters
	pub a: f64,
	/// inverse flattening
	pub inv_f: f64,
}

impl Ellipsoid {
	pub const WGS84: Ellipsoid = Ellipsoid {
		a: 6378137.0,
		inv_f: 298.257223563,
	};
	pub const GRS80: Ellipsoid = Ellipsoid {
		a: 6378137.0,
		inv_f: 298.257222101,
	};

	pub fn f(&self) -> f64 {
		1.0 / self.inv_f
	}

	/// first eccentricity squared
	pub fn e2(&self) -> f64 {
		let f = self.f();
		2.0 * f - f * f
	}

	/// Geodetic (degrees, height 0) to earth-centered cartesian coordinates.
	pub fn to_geocentric(&self, lon: f64, lat: f64) -> [f64; 3] {
		let (lon, lat) = (lon.to_radians(), lat.to_radians());
		let e2 = self.e2();
		let n = self.a / (1.0 - e2 * lat.sin().powi(2)).sqrt();
		[n * lat.cos() * lon.cos(), n * lat.cos() * lon.sin(), n * (1.0 - e2) * lat.sin()]
	}

	/// Earth-centered cartesian coordinates to geodetic degrees `(lon, lat)`.
	pub fn from_geocentric(&self, xyz: [f64; 3]) -> (f64, f64) {
		let [x, y, z] = xyz;
		let e2 = self.e2();
		let p = (x * x + y * y).sqrt();
		let lon = y.atan2(x);

		let mut lat = z.atan2(p * (1.0 - e2));
		for _ in 0..10 {
			let n = self.a / (1.0 - e2 * lat.sin().powi(2)).sqrt();
			let h = p / lat.cos() - n;
			let next = z.atan2(p * (1.0 - e2 * n / (n + h)));
			let done = (next - lat).abs() < 1e-14;
			lat = next;
			if done {
				break;
			}
		}
		(lon.to_degrees(), lat.to_degrees())
	}
}

/// Shifts geodetic coordinates between datums with a three parameter (translation only) transform.
pub fn shift_datum(lon: f64, lat: f64, from: &Ellipsoid, to: &Ellipsoid, translation: [f64; 3]) -> (f64, f64) {
	let [x, y, z] = from.to_geocentric(lon, lat);
	to.from_geocentric([x + translation[0], y + translation[1], z + translation[2]])
}
