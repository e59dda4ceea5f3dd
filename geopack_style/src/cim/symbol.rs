use super::CimColor;
use serde::{Deserialize, Deserializer, de::Error};
use serde_json::Value;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CimSymbolReference {
	#[serde(default)]
	pub symbol: Option<CimSymbol>,
}

/// A polygon, line, point or text symbol. Symbol layers are listed top first.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CimSymbol {
	#[serde(default, rename = "type")]
	pub kind: String,
	#[serde(default)]
	pub symbol_layers: Vec<CimSymbolLayer>,
	/// text symbols only
	#[serde(default)]
	pub font_family_name: Option<String>,
	/// text symbols only, in points
	#[serde(default)]
	pub height: Option<f64>,
}

#[derive(Clone, Debug)]
pub enum CimSymbolLayer {
	SolidFill(CimSolidFill),
	SolidStroke(CimSolidStroke),
	HatchFill(CimHatchFill),
	VectorMarker(CimVectorMarker),
	/// gradient fills, picture fills, character markers and everything else
	Unsupported(CimOtherLayer),
}

impl CimSymbolLayer {
	pub fn is_enabled(&self) -> bool {
		match self {
			CimSymbolLayer::SolidFill(layer) => layer.enable,
			CimSymbolLayer::SolidStroke(layer) => layer.enable,
			CimSymbolLayer::HatchFill(layer) => layer.enable,
			CimSymbolLayer::VectorMarker(layer) => layer.enable,
			CimSymbolLayer::Unsupported(layer) => layer.enable,
		}
	}
}

// Tagged by "type"; unknown types keep their `enable` flag, which `#[serde(other)]` would drop.
impl<'de> Deserialize<'de> for CimSymbolLayer {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let value = Value::deserialize(deserializer)?;
		let kind = value.get("type").and_then(Value::as_str).unwrap_or_default().to_string();
		let layer = match kind.as_str() {
			"CIMSolidFill" => serde_json::from_value(value).map(CimSymbolLayer::SolidFill),
			"CIMSolidStroke" => serde_json::from_value(value).map(CimSymbolLayer::SolidStroke),
			"CIMHatchFill" => serde_json::from_value(value).map(CimSymbolLayer::HatchFill),
			"CIMVectorMarker" => serde_json::from_value(value).map(CimSymbolLayer::VectorMarker),
			_ => serde_json::from_value(value).map(CimSymbolLayer::Unsupported),
		};
		layer.map_err(|error| D::Error::custom(format!("symbol layer '{kind}': {error}")))
	}
}

fn enabled() -> bool {
	true
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CimOtherLayer {
	#[serde(default, rename = "type")]
	pub kind: String,
	#[serde(default = "enabled")]
	pub enable: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CimSolidFill {
	#[serde(default = "enabled")]
	pub enable: bool,
	#[serde(default)]
	pub color: Option<CimColor>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CimSolidStroke {
	#[serde(default = "enabled")]
	pub enable: bool,
	#[serde(default)]
	pub color: Option<CimColor>,
	/// points
	#[serde(default)]
	pub width: f64,
	#[serde(default)]
	pub effects: Vec<CimGeometricEffect>,
}

impl CimSolidStroke {
	/// The dash template in points, if the stroke is dashed.
	pub fn dash_template(&self) -> Option<&[f64]> {
		self.effects.iter().find_map(|effect| match effect {
			CimGeometricEffect::Dashes(dashes) if !dashes.dash_template.is_empty() => Some(dashes.dash_template.as_slice()),
			_ => None,
		})
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type")]
pub enum CimGeometricEffect {
	#[serde(rename = "CIMGeometricEffectDashes")]
	Dashes(CimDashes),
	#[serde(other)]
	Other,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CimDashes {
	#[serde(default)]
	pub dash_template: Vec<f64>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CimHatchFill {
	#[serde(default = "enabled")]
	pub enable: bool,
	#[serde(default)]
	pub line_symbol: Option<CimSymbol>,
	/// degrees
	#[serde(default)]
	pub rotation: f64,
	#[serde(default)]
	pub separation: f64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CimVectorMarker {
	#[serde(default = "enabled")]
	pub enable: bool,
	/// points
	#[serde(default)]
	pub size: f64,
	#[serde(default)]
	pub marker_graphics: Vec<CimMarkerGraphic>,
	#[serde(default)]
	pub marker_placement: Option<CimMarkerPlacement>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CimMarkerGraphic {
	/// Esri JSON geometry: `{"x", "y"}`, `{"rings"}`, `{"paths"}` or `{"curveRings"}`
	#[serde(default)]
	pub geometry: Option<Value>,
	#[serde(default)]
	pub symbol: Option<CimSymbol>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CimMarkerPlacement {
	#[serde(default, rename = "type")]
	pub kind: String,
	#[serde(default)]
	pub placement_template: Vec<f64>,
	#[serde(default)]
	pub offset: f64,
	#[serde(default)]
	pub angle_to_line: bool,
}

impl CimMarkerPlacement {
	/// `CIMMarkerPlacementAlongLineSameSize`, `...VariableSize`, `...RandomSize`
	pub fn is_along_line(&self) -> bool {
		self.kind.starts_with("CIMMarkerPlacementAlongLine")
	}
}
