//! RGB colors and the channel/opacity normalization shared by all style sources.
//!
//! Source documents are inconsistent about scales: a channel may be given as `0.5` (0–1 scale)
//! or as `128` (0–255 scale), an opacity as `0.5` or as `50` (percent). Both are told apart by
//! magnitude only: values up to and including `1.0` are read as the 0–1 scale.

use std::fmt;

/// Factor from point based sizes (72 per inch) to device pixels (96 per inch).
pub const POINTS_TO_PIXELS: f64 = 96.0 / 72.0;

/// Converts a size given in points into device pixels.
pub fn points_to_pixels(points: f64) -> f64 {
	points * POINTS_TO_PIXELS
}

/// Normalizes one color channel into the 0–255 range.
///
/// `0.5` becomes `128`, `200` stays `200`. A value of exactly `1.0` is read as full intensity.
pub fn normalize_channel(value: f64) -> u8 {
	if !value.is_finite() {
		return 0;
	}
	let scaled = if value <= 1.0 { value * 255.0 } else { value };
	scaled.round().clamp(0.0, 255.0) as u8
}

/// Normalizes an opacity into the 0–1 range. Values above `1.0` are percentages.
pub fn normalize_opacity(value: f64) -> f64 {
	if !value.is_finite() {
		return 1.0;
	}
	let scaled = if value <= 1.0 { value } else { value / 100.0 };
	scaled.clamp(0.0, 1.0)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Rgb {
	pub const BLACK: Rgb = Rgb::new(0, 0, 0);
	pub const GRAY: Rgb = Rgb::new(128, 128, 128);

	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	/// Builds a color from raw channel values of unknown scale.
	pub fn from_channels(r: f64, g: f64, b: f64) -> Self {
		Self {
			r: normalize_channel(r),
			g: normalize_channel(g),
			b: normalize_channel(b),
		}
	}

	pub fn to_hex(&self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}

impl fmt::Display for Rgb {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_hex())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;
	use rstest::rstest;

	#[rstest]
	#[case(0.5, 128)]
	#[case(200.0, 200)]
	#[case(0.0, 0)]
	#[case(1.0, 255)]
	#[case(255.0, 255)]
	#[case(300.0, 255)]
	#[case(-4.0, 0)]
	#[case(f64::NAN, 0)]
	fn channel_normalization(#[case] input: f64, #[case] expected: u8) {
		assert_eq!(normalize_channel(input), expected);
	}

	#[rstest]
	#[case(0.5, 0.5)]
	#[case(50.0, 0.5)]
	#[case(100.0, 1.0)]
	#[case(1.0, 1.0)]
	#[case(0.0, 0.0)]
	#[case(250.0, 1.0)]
	fn opacity_normalization(#[case] input: f64, #[case] expected: f64) {
		assert_relative_eq!(normalize_opacity(input), expected);
	}

	#[test]
	fn hex_formatting() {
		assert_eq!(Rgb::new(255, 0, 0).to_hex(), "#ff0000");
		assert_eq!(Rgb::from_channels(0.0, 0.5, 1.0).to_string(), "#0080ff");
		assert_eq!(Rgb::GRAY.to_hex(), "#808080");
	}

	#[test]
	fn point_sizes_become_pixels() {
		assert_relative_eq!(points_to_pixels(2.0), 2.666_666_666, epsilon = 1e-6);
		assert_relative_eq!(points_to_pixels(72.0), 96.0);
	}
}
