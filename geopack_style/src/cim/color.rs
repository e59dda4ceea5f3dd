use geopack_core::{Rgb, normalize_channel, normalize_opacity};
use serde::Deserialize;

/// CIM colors. Every model carries its alpha (0–100) as the last value.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type")]
pub enum CimColor {
	/// `[r, g, b, alpha]`
	#[serde(rename = "CIMRGBColor")]
	Rgb(CimColorValues),
	/// `[hue 0–360, saturation 0–100, value 0–100, alpha]`
	#[serde(rename = "CIMHSVColor")]
	Hsv(CimColorValues),
	/// `[c, m, y, k, alpha]`, each 0–100
	#[serde(rename = "CIMCMYKColor")]
	Cmyk(CimColorValues),
	/// `[gray, alpha]`
	#[serde(rename = "CIMGrayColor")]
	Gray(CimColorValues),
	#[serde(other)]
	Unsupported,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CimColorValues {
	#[serde(default)]
	pub values: Vec<f64>,
}

impl CimColorValues {
	fn get(&self, index: usize, default: f64) -> f64 {
		self.values.get(index).copied().unwrap_or(default)
	}
}

fn unit_to_byte(value: f64) -> u8 {
	(value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> Rgb {
	let s = (saturation / 100.0).clamp(0.0, 1.0);
	let v = (value / 100.0).clamp(0.0, 1.0);
	let h = hue.rem_euclid(360.0) / 60.0;
	let c = v * s;
	let x = c * (1.0 - (h % 2.0 - 1.0).abs());
	let (r, g, b) = match h as u8 {
		0 => (c, x, 0.0),
		1 => (x, c, 0.0),
		2 => (0.0, c, x),
		3 => (0.0, x, c),
		4 => (x, 0.0, c),
		_ => (c, 0.0, x),
	};
	let m = v - c;
	Rgb::new(unit_to_byte(r + m), unit_to_byte(g + m), unit_to_byte(b + m))
}

impl CimColor {
	/// The color as RGB plus opacity in 0–1. `None` for unknown color models.
	pub fn to_rgb(&self) -> Option<(Rgb, f64)> {
		Some(match self {
			CimColor::Rgb(c) => (
				Rgb::from_channels(c.get(0, 0.0), c.get(1, 0.0), c.get(2, 0.0)),
				normalize_opacity(c.get(3, 100.0)),
			),
			CimColor::Hsv(c) => (
				hsv_to_rgb(c.get(0, 0.0), c.get(1, 0.0), c.get(2, 0.0)),
				normalize_opacity(c.get(3, 100.0)),
			),
			CimColor::Cmyk(c) => {
				let k = 1.0 - c.get(3, 0.0) / 100.0;
				let channel = |index| unit_to_byte((1.0 - c.get(index, 0.0) / 100.0) * k);
				(Rgb::new(channel(0), channel(1), channel(2)), normalize_opacity(c.get(4, 100.0)))
			}
			CimColor::Gray(c) => {
				let gray = normalize_channel(c.get(0, 0.0));
				(Rgb::new(gray, gray, gray), normalize_opacity(c.get(1, 100.0)))
			}
			CimColor::Unsupported => return None,
		})
	}
}
