//! Flattening of nested CIM symbols into one list of drawing primitives.
//!
//! Fills, strokes and hatches of the walked symbol become list entries. A vector marker becomes
//! one entry carrying the fill and stroke of its graphic; markers nested inside that graphic are
//! emitted as entries of their own, ahead of the marker that contains them. The list keeps the CIM
//! order, top layer first.

use crate::cim::{CimColor, CimHatchFill, CimSolidStroke, CimSymbol, CimSymbolLayer, CimVectorMarker};
use geopack_core::{MarkerShape, Rgb};
use log::{debug, warn};
use serde_json::Value;

/// Nesting limit for symbols inside markers and hatches.
pub const MAX_SYMBOL_DEPTH: usize = 10;

/// Thin rings at least this many times longer than wide are drawn as ticks.
const TICK_ASPECT: f64 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
	pub color: Rgb,
	/// 0–1
	pub opacity: f64,
}

impl Paint {
	fn from_cim(color: Option<&CimColor>) -> Self {
		match color.and_then(CimColor::to_rgb) {
			Some((color, opacity)) => Paint { color, opacity },
			None => {
				debug!("missing or unsupported color, using black");
				Paint {
					color: Rgb::BLACK,
					opacity: 1.0,
				}
			}
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinePlacement {
	/// first value of the placement template, in points
	pub interval: Option<f64>,
	/// points
	pub offset: f64,
	pub align_to_line: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlatMarker {
	/// points
	pub size: f64,
	pub shape: MarkerShape,
	pub along_line: Option<LinePlacement>,
	pub fill: Option<Paint>,
	/// paint and width in points
	pub stroke: Option<(Paint, f64)>,
}

/// One drawing primitive. All sizes are still in points.
#[derive(Clone, Debug, PartialEq)]
pub enum FlatLayer {
	Fill(Paint),
	Stroke {
		paint: Paint,
		width: f64,
		dashes: Option<Vec<f64>>,
	},
	Hatch {
		paint: Paint,
		rotation: f64,
		separation: f64,
		line_width: f64,
	},
	Marker(FlatMarker),
	/// a symbol layer type we do not translate
	Unsupported,
}

/// Walks a symbol tree depth first with a hard depth limit.
#[derive(Clone, Copy, Debug)]
pub struct SymbolFlattener {
	max_depth: usize,
}

impl Default for SymbolFlattener {
	fn default() -> Self {
		Self::new(MAX_SYMBOL_DEPTH)
	}
}

impl SymbolFlattener {
	pub fn new(max_depth: usize) -> Self {
		Self { max_depth }
	}

	pub fn flatten(&self, symbol: &CimSymbol) -> Vec<FlatLayer> {
		let mut layers = Vec::new();
		self.visit(symbol, 0, &mut layers);
		layers
	}

	fn visit(&self, symbol: &CimSymbol, depth: usize, out: &mut Vec<FlatLayer>) {
		if depth >= self.max_depth {
			warn!(
				"symbol nesting exceeds {} levels, ignoring the {} inside",
				self.max_depth, symbol.kind
			);
			return;
		}
		for layer in symbol.symbol_layers.iter().filter(|layer| layer.is_enabled()) {
			match layer {
				CimSymbolLayer::SolidFill(fill) => out.push(FlatLayer::Fill(Paint::from_cim(fill.color.as_ref()))),
				CimSymbolLayer::SolidStroke(stroke) => out.push(stroke_layer(stroke)),
				CimSymbolLayer::HatchFill(hatch) => out.push(self.hatch_layer(hatch, depth)),
				CimSymbolLayer::VectorMarker(marker) => self.visit_marker(marker, depth, out),
				CimSymbolLayer::Unsupported(other) => {
					debug!("no translation for symbol layer {}", other.kind);
					out.push(FlatLayer::Unsupported);
				}
			}
		}
	}

	fn hatch_layer(&self, hatch: &CimHatchFill, depth: usize) -> FlatLayer {
		let mut lines = Vec::new();
		if let Some(symbol) = &hatch.line_symbol {
			self.visit(symbol, depth + 1, &mut lines);
		}
		let (paint, line_width) = lines
			.into_iter()
			.find_map(|layer| match layer {
				FlatLayer::Stroke { paint, width, .. } => Some((paint, width)),
				_ => None,
			})
			.unwrap_or((Paint::from_cim(None), 1.0));
		FlatLayer::Hatch {
			paint,
			rotation: hatch.rotation,
			separation: hatch.separation,
			line_width,
		}
	}

	fn visit_marker(&self, marker: &CimVectorMarker, depth: usize, out: &mut Vec<FlatLayer>) {
		let mut inner = Vec::new();
		for graphic in &marker.marker_graphics {
			if let Some(symbol) = &graphic.symbol {
				self.visit(symbol, depth + 1, &mut inner);
			}
		}

		let fill = inner.iter().find_map(|layer| match layer {
			FlatLayer::Fill(paint) => Some(*paint),
			_ => None,
		});
		let stroke = inner.iter().find_map(|layer| match layer {
			FlatLayer::Stroke { paint, width, .. } => Some((*paint, *width)),
			_ => None,
		});
		let shape = marker
			.marker_graphics
			.iter()
			.find_map(|graphic| graphic.geometry.as_ref())
			.map_or(MarkerShape::Circle, marker_shape);
		let along_line = marker
			.marker_placement
			.as_ref()
			.filter(|placement| placement.is_along_line())
			.map(|placement| LinePlacement {
				interval: placement.placement_template.first().copied(),
				offset: placement.offset,
				align_to_line: placement.angle_to_line,
			});

		out.extend(
			inner
				.into_iter()
				.filter(|layer| matches!(layer, FlatLayer::Marker(_) | FlatLayer::Unsupported)),
		);
		out.push(FlatLayer::Marker(FlatMarker {
			size: marker.size,
			shape,
			along_line,
			fill,
			stroke,
		}));
	}
}

fn stroke_layer(stroke: &CimSolidStroke) -> FlatLayer {
	FlatLayer::Stroke {
		paint: Paint::from_cim(stroke.color.as_ref()),
		width: stroke.width,
		dashes: stroke.dash_template().map(<[f64]>::to_vec),
	}
}

/// Square for line graphics and thin rings (ticks), circle for everything else.
fn marker_shape(geometry: &Value) -> MarkerShape {
	if geometry.get("paths").is_some() {
		return MarkerShape::Square;
	}
	let Some(rings) = geometry.get("rings").and_then(Value::as_array) else {
		return MarkerShape::Circle;
	};

	let mut bounds: Option<[f64; 4]> = None;
	for point in rings.iter().filter_map(Value::as_array).flatten().filter_map(Value::as_array) {
		let (Some(x), Some(y)) = (point.first().and_then(Value::as_f64), point.get(1).and_then(Value::as_f64)) else {
			continue;
		};
		let b = bounds.get_or_insert([x, y, x, y]);
		b[0] = b[0].min(x);
		b[1] = b[1].min(y);
		b[2] = b[2].max(x);
		b[3] = b[3].max(y);
	}
	let Some([x0, y0, x1, y1]) = bounds else {
		return MarkerShape::Circle;
	};

	let (width, height) = (x1 - x0, y1 - y0);
	let (long, short) = (width.max(height), width.min(height));
	if short <= 0.0 || long / short >= TICK_ASPECT {
		MarkerShape::Square
	} else {
		MarkerShape::Circle
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use serde_json::json;

	fn symbol(value: Value) -> CimSymbol {
		serde_json::from_value(value).unwrap()
	}

	fn rgb(r: u8, g: u8, b: u8) -> Value {
		json!({"type": "CIMRGBColor", "values": [r, g, b, 100]})
	}

	/// A point symbol whose marker graphic holds another point symbol, `levels` deep.
	fn nested_markers(levels: usize) -> Value {
		let mut inner = json!({"type": "CIMPolygonSymbol", "symbolLayers": [{"type": "CIMSolidFill", "color": rgb(1, 2, 3)}]});
		for _ in 0..levels {
			inner = json!({
				"type": "CIMPointSymbol",
				"symbolLayers": [{"type": "CIMVectorMarker", "size": 4, "markerGraphics": [{"geometry": {"x": 0, "y": 0}, "symbol": inner}]}]
			});
		}
		inner
	}

	#[test]
	fn skips_disabled_layers() {
		let layers = SymbolFlattener::default().flatten(&symbol(json!({
			"type": "CIMPolygonSymbol",
			"symbolLayers": [
				{"type": "CIMSolidStroke", "enable": false, "width": 1, "color": rgb(0, 0, 0)},
				{"type": "CIMSolidFill", "color": rgb(255, 0, 0)}
			]
		})));
		assert_eq!(
			layers,
			vec![FlatLayer::Fill(Paint {
				color: Rgb::new(255, 0, 0),
				opacity: 1.0
			})]
		);
	}

	#[test]
	fn marker_takes_paint_from_its_graphic() {
		let layers = SymbolFlattener::default().flatten(&symbol(json!({
			"type": "CIMPointSymbol",
			"symbolLayers": [{
				"type": "CIMVectorMarker",
				"size": 6,
				"markerGraphics": [{
					"geometry": {"curveRings": []},
					"symbol": {"type": "CIMPolygonSymbol", "symbolLayers": [
						{"type": "CIMSolidStroke", "width": 0.5, "color": rgb(0, 0, 0)},
						{"type": "CIMSolidFill", "color": rgb(0, 0, 255)}
					]}
				}]
			}]
		})));
		let [FlatLayer::Marker(marker)] = layers.as_slice() else {
			panic!("expected a single marker, got {layers:?}");
		};
		assert_eq!(marker.size, 6.0);
		assert_eq!(marker.shape, MarkerShape::Circle);
		assert_eq!(marker.fill.unwrap().color, Rgb::new(0, 0, 255));
		assert_eq!(marker.stroke.unwrap().1, 0.5);
		assert!(marker.along_line.is_none());
	}

	#[test]
	fn nested_markers_are_listed_before_their_parent() {
		let layers = SymbolFlattener::default().flatten(&symbol(nested_markers(3)));
		assert_eq!(layers.len(), 3);
		assert!(layers.iter().all(|layer| matches!(layer, FlatLayer::Marker(_))));
		// only the innermost marker has a fill
		let FlatLayer::Marker(innermost) = &layers[0] else { unreachable!() };
		assert_eq!(innermost.fill.unwrap().color, Rgb::new(1, 2, 3));
	}

	#[test]
	fn depth_is_bounded() {
		let layers = SymbolFlattener::default().flatten(&symbol(nested_markers(25)));
		assert_eq!(layers.len(), MAX_SYMBOL_DEPTH);

		let layers = SymbolFlattener::new(2).flatten(&symbol(nested_markers(25)));
		assert_eq!(layers.len(), 2);
	}

	#[test]
	fn hatch_reads_its_line_symbol() {
		let layers = SymbolFlattener::default().flatten(&symbol(json!({
			"type": "CIMPolygonSymbol",
			"symbolLayers": [{
				"type": "CIMHatchFill", "rotation": 45, "separation": 5,
				"lineSymbol": {"type": "CIMLineSymbol", "symbolLayers": [{"type": "CIMSolidStroke", "width": 0.75, "color": rgb(0, 128, 0)}]}
			}]
		})));
		assert_eq!(
			layers,
			vec![FlatLayer::Hatch {
				paint: Paint {
					color: Rgb::new(0, 128, 0),
					opacity: 1.0
				},
				rotation: 45.0,
				separation: 5.0,
				line_width: 0.75
			}]
		);
	}

	#[test]
	fn along_line_placement() {
		let layers = SymbolFlattener::default().flatten(&symbol(json!({
			"type": "CIMLineSymbol",
			"symbolLayers": [{
				"type": "CIMVectorMarker", "size": 3,
				"markerGraphics": [{"geometry": {"paths": [[[0, 0], [0, 5]]]}}],
				"markerPlacement": {"type": "CIMMarkerPlacementAlongLineSameSize", "placementTemplate": [12, 4], "offset": 1.5, "angleToLine": true}
			}]
		})));
		let [FlatLayer::Marker(marker)] = layers.as_slice() else {
			panic!("expected a single marker, got {layers:?}");
		};
		assert_eq!(marker.shape, MarkerShape::Square);
		assert_eq!(
			marker.along_line,
			Some(LinePlacement {
				interval: Some(12.0),
				offset: 1.5,
				align_to_line: true
			})
		);
	}

	#[test]
	fn unsupported_layers_are_kept() {
		let layers = SymbolFlattener::default().flatten(&symbol(json!({
			"type": "CIMPolygonSymbol",
			"symbolLayers": [{"type": "CIMPictureFill", "url": "x.png"}]
		})));
		assert_eq!(layers, vec![FlatLayer::Unsupported]);
	}

	#[test]
	fn disabled_unsupported_layers_are_skipped() {
		let layers = SymbolFlattener::default().flatten(&symbol(json!({
			"type": "CIMPolygonSymbol",
			"symbolLayers": [
				{"type": "CIMPictureFill", "enable": false, "url": "x.png"},
				{"type": "CIMSolidFill", "color": {"type": "CIMRGBColor", "values": [255, 0, 0, 100]}}
			]
		})));
		assert_eq!(
			layers,
			vec![FlatLayer::Fill(Paint {
				color: Rgb::new(255, 0, 0),
				opacity: 1.0
			})]
		);
	}

	#[test]
	fn shapes_from_geometry() {
		assert_eq!(marker_shape(&json!({"x": 0, "y": 0})), MarkerShape::Circle);
		assert_eq!(marker_shape(&json!({"paths": []})), MarkerShape::Square);
		let ring = |w: f64, h: f64| json!({"rings": [[[0.0, 0.0], [w, 0.0], [w, h], [0.0, h], [0.0, 0.0]]]});
		assert_eq!(marker_shape(&ring(4.0, 4.0)), MarkerShape::Circle);
		assert_eq!(marker_shape(&ring(1.0, 3.0)), MarkerShape::Square);
		assert_eq!(marker_shape(&ring(2.0, 5.0)), MarkerShape::Circle);
	}
}
