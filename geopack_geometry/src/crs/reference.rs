use serde_json::Value;

/// The coordinate reference a document's positions are expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordinateReference {
	/// WGS 84 longitude/latitude degrees
	Canonical,
	WebMercator,
	/// the configured regional grid
	Regional,
	/// declared, but not something we can reproject
	Unsupported(u32),
}

impl CoordinateReference {
	/// Interprets an EPSG code, with `regional_epsg` naming the configured regional grid.
	pub fn from_epsg(code: u32, regional_epsg: u32) -> Self {
		match code {
			4326 => Self::Canonical,
			3857 | 900_913 | 102_100 | 102_113 | 3785 => Self::WebMercator,
			c if c == regional_epsg => Self::Regional,
			c => Self::Unsupported(c),
		}
	}

	/// Reads the legacy GeoJSON `crs` member, e.g.
	/// `{"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::2039"}}`.
	///
	/// Returns `None` when the member is absent or unreadable.
	pub fn from_crs_member(crs: &Value, regional_epsg: u32) -> Option<Self> {
		let name = crs.get("properties")?.get("name")?.as_str()?;
		Self::from_crs_name(name, regional_epsg)
	}

	/// Parses names like `EPSG:3857`, `urn:ogc:def:crs:EPSG::2039` or `urn:ogc:def:crs:OGC:1.3:CRS84`.
	pub fn from_crs_name(name: &str, regional_epsg: u32) -> Option<Self> {
		let name = name.trim();
		if name.to_ascii_uppercase().ends_with("CRS84") {
			return Some(Self::Canonical);
		}
		let upper = name.to_ascii_uppercase();
		let position = upper.rfind("EPSG")?;
		let code = upper[position + 4..]
			.trim_start_matches(|c: char| !c.is_ascii_digit())
			.split(|c: char| !c.is_ascii_digit())
			.next()?
			.parse::<u32>()
			.ok()?;
		Some(Self::from_epsg(code, regional_epsg))
	}
}
