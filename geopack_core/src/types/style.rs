//! Renderer-agnostic style model written to `styles.json`.
//!
//! A [`StyleConfig`] carries two views of the same symbology: a [`SimpleStyle`] that plain
//! GeoJSON renderers can apply directly, and an ordered list of [`SymbolLayer`]s (bottom layer
//! first) for renderers able to stack fills, strokes and markers.

use super::{GeometryType, Rgb};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RendererKind {
	Simple,
	UniqueValue,
	Image,
}

/// Whether a style can be drawn from plain GeoJSON or needs tiled delivery.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
	#[default]
	Simple,
	Advanced,
}

impl Complexity {
	/// Escalates to `Advanced` when `condition` holds. Never goes back to `Simple`.
	pub fn escalate_if(&mut self, condition: bool) {
		if condition {
			*self = Complexity::Advanced;
		}
	}

	pub fn is_advanced(&self) -> bool {
		*self == Complexity::Advanced
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HatchStyle {
	pub color: String,
	pub rotation: f64,
	pub separation: f64,
	pub line_width: f64,
}

/// The flattened, single-symbol description of a style.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleStyle {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fill_color: Option<String>,
	pub fill_opacity: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stroke_color: Option<String>,
	pub stroke_width: f64,
	pub stroke_opacity: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub dash_array: Option<Vec<f64>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub hatch: Option<HatchStyle>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub marker_size: Option<f64>,
}

impl SimpleStyle {
	/// A style without any fill or stroke.
	pub fn empty() -> Self {
		Self {
			fill_color: None,
			fill_opacity: 0.0,
			stroke_color: None,
			stroke_width: 0.0,
			stroke_opacity: 0.0,
			dash_array: None,
			hatch: None,
			marker_size: None,
		}
	}

	/// Gray fill with a thin black outline, used whenever no usable style document exists.
	pub fn fallback() -> Self {
		Self {
			fill_color: Some(Rgb::GRAY.to_hex()),
			fill_opacity: 0.5,
			stroke_color: Some(Rgb::BLACK.to_hex()),
			stroke_width: 1.0,
			stroke_opacity: 1.0,
			..Self::empty()
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillType {
	Solid,
	Hatch,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillLayer {
	pub fill_type: FillType,
	pub color: String,
	pub opacity: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rotation: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub separation: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub line_width: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeLayer {
	pub color: String,
	pub width: f64,
	pub opacity: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub dash_array: Option<Vec<f64>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerPlacement {
	Point,
	Line,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerShape {
	Circle,
	Square,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerLayer {
	pub placement: MarkerPlacement,
	pub shape: MarkerShape,
	pub size: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fill_color: Option<String>,
	pub fill_opacity: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stroke_color: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stroke_width: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub interval: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub offset: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub align_to_line: Option<bool>,
}

/// One drawing primitive of a stacked style.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SymbolLayer {
	Fill(FillLayer),
	Stroke(StrokeLayer),
	Marker(MarkerLayer),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueValueClass {
	/// Each inner list holds one value per classification field.
	pub match_values: Vec<Vec<String>>,
	pub label: String,
	pub style: SimpleStyle,
	pub symbol_layers: Vec<SymbolLayer>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueValues {
	pub fields: Vec<String>,
	pub classes: Vec<UniqueValueClass>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelStyle {
	pub field: String,
	pub font: String,
	pub size: f64,
}

/// Visibility limits as map scale denominators.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleRange {
	pub min: f64,
	pub max: f64,
}

fn is_false(value: &bool) -> bool {
	!*value
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
	pub geometry_type: GeometryType,
	pub renderer: RendererKind,
	pub default_style: SimpleStyle,
	pub symbol_layers: Vec<SymbolLayer>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub unique_values: Option<UniqueValues>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub labels: Option<LabelStyle>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub scale_range: Option<ScaleRange>,
	pub complexity: Complexity,
	#[serde(default, skip_serializing_if = "is_false")]
	pub fallback: bool,
}

impl StyleConfig {
	/// The style given to layers without a matching or readable style document.
	pub fn fallback(geometry_type: GeometryType) -> Self {
		Self {
			geometry_type,
			renderer: RendererKind::Simple,
			default_style: SimpleStyle::fallback(),
			symbol_layers: Vec::new(),
			unique_values: None,
			labels: None,
			scale_range: None,
			complexity: Complexity::Simple,
			fallback: true,
		}
	}

	/// The style of raster layers.
	pub fn image() -> Self {
		Self {
			geometry_type: GeometryType::Image,
			renderer: RendererKind::Image,
			default_style: SimpleStyle::empty(),
			symbol_layers: Vec::new(),
			unique_values: None,
			labels: None,
			scale_range: None,
			complexity: Complexity::Simple,
			fallback: false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn complexity_only_escalates() {
		let mut complexity = Complexity::Simple;
		complexity.escalate_if(false);
		assert_eq!(complexity, Complexity::Simple);
		complexity.escalate_if(true);
		complexity.escalate_if(false);
		assert!(complexity.is_advanced());
		assert_eq!(Complexity::Simple.max(Complexity::Advanced), Complexity::Advanced);
	}

	#[test]
	fn symbol_layers_are_tagged() {
		let layer = SymbolLayer::Stroke(StrokeLayer {
			color: "#000000".to_string(),
			width: 2.0,
			opacity: 1.0,
			dash_array: None,
		});
		assert_eq!(
			serde_json::to_string(&layer).unwrap(),
			r##"{"type":"stroke","color":"#000000","width":2.0,"opacity":1.0}"##
		);
		let parsed: SymbolLayer = serde_json::from_str(r##"{"type":"fill","fillType":"hatch","color":"#ff0000","opacity":1.0,"rotation":45.0}"##).unwrap();
		match parsed {
			SymbolLayer::Fill(fill) => {
				assert_eq!(fill.fill_type, FillType::Hatch);
				assert_eq!(fill.rotation, Some(45.0));
			}
			other => panic!("unexpected layer {other:?}"),
		}
	}

	#[test]
	fn fallback_style_is_flagged() {
		let style = StyleConfig::fallback(GeometryType::Polygon);
		let json = serde_json::to_value(&style).unwrap();
		assert_eq!(json["fallback"], true);
		assert_eq!(json["defaultStyle"]["fillColor"], "#808080");
		assert_eq!(json["defaultStyle"]["strokeColor"], "#000000");
		assert_eq!(json["renderer"], "simple");

		let image = serde_json::to_value(StyleConfig::image()).unwrap();
		assert!(image.get("fallback").is_none());
		assert_eq!(image["renderer"], "image");
	}
}
