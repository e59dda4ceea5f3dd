use super::flatten::{FlatLayer, FlatMarker};
use geopack_core::{
	Complexity, FillLayer, FillType, HatchStyle, MarkerLayer, MarkerPlacement, SimpleStyle, StrokeLayer, SymbolLayer,
	points_to_pixels,
};

/// The single-style summary: first solid fill, first stroke, first hatch, first marker size.
///
/// Point symbols usually consist of markers only, so without a plain fill or stroke the first
/// marker's paint is used instead.
pub fn simple_style(layers: &[FlatLayer]) -> SimpleStyle {
	let mut style = SimpleStyle::empty();
	let first_marker = layers.iter().find_map(|layer| match layer {
		FlatLayer::Marker(marker) => Some(marker),
		_ => None,
	});

	let fill = layers
		.iter()
		.find_map(|layer| match layer {
			FlatLayer::Fill(paint) => Some(*paint),
			_ => None,
		})
		.or_else(|| first_marker.and_then(|marker| marker.fill));
	if let Some(paint) = fill {
		style.fill_color = Some(paint.color.to_hex());
		style.fill_opacity = paint.opacity;
	}

	let stroke = layers
		.iter()
		.find_map(|layer| match layer {
			FlatLayer::Stroke { paint, width, dashes } => Some((*paint, *width, dashes.clone())),
			_ => None,
		})
		.or_else(|| first_marker.and_then(|marker| marker.stroke).map(|(paint, width)| (paint, width, None)));
	if let Some((paint, width, dashes)) = stroke {
		style.stroke_color = Some(paint.color.to_hex());
		style.stroke_width = points_to_pixels(width);
		style.stroke_opacity = paint.opacity;
		style.dash_array = dashes.map(|dashes| dashes.into_iter().map(points_to_pixels).collect());
	}

	style.hatch = layers.iter().find_map(|layer| match layer {
		FlatLayer::Hatch {
			paint,
			rotation,
			separation,
			line_width,
		} => Some(HatchStyle {
			color: paint.color.to_hex(),
			rotation: *rotation,
			separation: *separation,
			line_width: points_to_pixels(*line_width),
		}),
		_ => None,
	});

	style.marker_size = first_marker.map(|marker| points_to_pixels(marker.size));
	style
}

fn marker_layer(marker: &FlatMarker) -> MarkerLayer {
	let placement = marker.along_line.as_ref();
	MarkerLayer {
		placement: if placement.is_some() {
			MarkerPlacement::Line
		} else {
			MarkerPlacement::Point
		},
		shape: marker.shape,
		size: points_to_pixels(marker.size),
		fill_color: marker.fill.map(|paint| paint.color.to_hex()),
		fill_opacity: marker.fill.map_or(0.0, |paint| paint.opacity),
		stroke_color: marker.stroke.map(|(paint, _)| paint.color.to_hex()),
		stroke_width: marker.stroke.map(|(_, width)| points_to_pixels(width)),
		interval: placement.and_then(|p| p.interval).map(points_to_pixels),
		offset: placement.map(|p| points_to_pixels(p.offset)),
		align_to_line: placement.map(|p| p.align_to_line),
	}
}

/// The full stack in render order, bottom layer first.
pub fn symbol_layers(layers: &[FlatLayer]) -> Vec<SymbolLayer> {
	layers
		.iter()
		.rev()
		.filter_map(|layer| {
			Some(match layer {
				FlatLayer::Fill(paint) => SymbolLayer::Fill(FillLayer {
					fill_type: FillType::Solid,
					color: paint.color.to_hex(),
					opacity: paint.opacity,
					rotation: None,
					separation: None,
					line_width: None,
				}),
				FlatLayer::Hatch {
					paint,
					rotation,
					separation,
					line_width,
				} => SymbolLayer::Fill(FillLayer {
					fill_type: FillType::Hatch,
					color: paint.color.to_hex(),
					opacity: paint.opacity,
					rotation: Some(*rotation),
					separation: Some(*separation),
					line_width: Some(points_to_pixels(*line_width)),
				}),
				FlatLayer::Stroke { paint, width, dashes } => SymbolLayer::Stroke(StrokeLayer {
					color: paint.color.to_hex(),
					width: points_to_pixels(*width),
					opacity: paint.opacity,
					dash_array: dashes.as_ref().map(|d| d.iter().copied().map(points_to_pixels).collect()),
				}),
				FlatLayer::Marker(marker) => SymbolLayer::Marker(marker_layer(marker)),
				FlatLayer::Unsupported => return None,
			})
		})
		.collect()
}

/// Advanced when more than one hatch, more than one stroke, a marker along a line or an
/// untranslated layer type is present.
pub fn complexity(layers: &[FlatLayer]) -> Complexity {
	let count = |predicate: fn(&FlatLayer) -> bool| layers.iter().filter(|layer| predicate(layer)).count();

	let mut complexity = Complexity::Simple;
	complexity.escalate_if(count(|layer| matches!(layer, FlatLayer::Hatch { .. })) > 1);
	complexity.escalate_if(count(|layer| matches!(layer, FlatLayer::Stroke { .. })) > 1);
	complexity.escalate_if(count(|layer| matches!(layer, FlatLayer::Marker(m) if m.along_line.is_some())) > 0);
	complexity.escalate_if(count(|layer| matches!(layer, FlatLayer::Unsupported)) > 0);
	complexity
}
