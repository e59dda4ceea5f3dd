use serde::Deserialize;

/// The always-present satellite imagery entry.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SatelliteConfig {
	pub id: String,
	pub display_name: String,
	pub url: String,
}

impl Default for SatelliteConfig {
	fn default() -> Self {
		Self {
			id: String::from("satellite"),
			display_name: String::from("Satellite"),
			url: String::from("https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"),
		}
	}
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BasePackConfig {
	pub id: String,
	pub name: String,
	pub satellite: SatelliteConfig,
}

impl Default for BasePackConfig {
	fn default() -> Self {
		Self {
			id: String::from("base"),
			name: String::from("Base"),
			satellite: SatelliteConfig::default(),
		}
	}
}
