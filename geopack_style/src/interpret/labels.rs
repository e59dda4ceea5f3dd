use crate::cim::{CimLabelClass, CimLayerDefinition};
use geopack_core::{LabelStyle, ScaleRange};
use regex::Regex;
use std::sync::LazyLock;

const DEFAULT_FONT: &str = "Arial";
const DEFAULT_FONT_SIZE: f64 = 10.0;

static FIELD_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"\$feature\.(\w+)|\$feature\[\s*["']([^"']+)["']\s*\]|\[([^\]]+)\]"#).unwrap()
});

/// Extracts the attribute a label expression shows.
///
/// Understands Arcade (`$feature.NAME`, `$feature["NAME"]`), VBScript/Python style `[NAME]` and a
/// bare field name.
fn label_field(expression: &str) -> Option<String> {
	if let Some(captures) = FIELD_REFERENCE.captures(expression) {
		return captures.iter().skip(1).flatten().next().map(|m| m.as_str().trim().to_string());
	}
	let trimmed = expression.trim();
	let bare = !trimmed.is_empty() && trimmed.chars().all(|c| c.is_alphanumeric() || c == '_');
	bare.then(|| trimmed.to_string())
}

fn label_style(class: &CimLabelClass) -> Option<LabelStyle> {
	let field = label_field(&class.expression)?;
	let text = class.text_symbol.as_ref().and_then(|reference| reference.symbol.as_ref());
	Some(LabelStyle {
		field,
		font: text
			.and_then(|symbol| symbol.font_family_name.clone())
			.unwrap_or_else(|| DEFAULT_FONT.to_string()),
		size: text.and_then(|symbol| symbol.height).unwrap_or(DEFAULT_FONT_SIZE),
	})
}

/// The label of the first visible label class with a readable expression.
pub fn labels(layer: &CimLayerDefinition) -> Option<LabelStyle> {
	layer
		.label_classes
		.iter()
		.filter(|class| class.visibility)
		.find_map(label_style)
}

/// Scale denominators, when at least one of them is set.
pub fn scale_range(layer: &CimLayerDefinition) -> Option<ScaleRange> {
	let min = layer.min_scale.unwrap_or(0.0);
	let max = layer.max_scale.unwrap_or(0.0);
	(min != 0.0 || max != 0.0).then_some(ScaleRange { min, max })
}
