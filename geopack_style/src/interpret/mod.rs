//! Turns a CIM layer document into a [`StyleConfig`].

mod derive;
mod flatten;
mod labels;

pub use flatten::{MAX_SYMBOL_DEPTH, SymbolFlattener};

use crate::cim::{CimDocument, CimRenderer, CimSymbol, CimSymbolReference, CimUniqueValueRenderer};
use anyhow::{Context, Result, bail};
use derive::{complexity, simple_style, symbol_layers};
use geopack_core::{
	Complexity, GeometryType, RendererKind, SimpleStyle, StyleConfig, UniqueValueClass, UniqueValues,
};
use log::{debug, warn};
use std::path::Path;

fn symbol_of(reference: Option<&CimSymbolReference>) -> Option<&CimSymbol> {
	reference.and_then(|reference| reference.symbol.as_ref())
}

fn geometry_type_of(symbol: &CimSymbol) -> GeometryType {
	match symbol.kind.as_str() {
		"CIMPointSymbol" => GeometryType::Point,
		"CIMLineSymbol" => GeometryType::Line,
		"CIMPolygonSymbol" => GeometryType::Polygon,
		_ => GeometryType::Unknown,
	}
}

/// The symbology derived from one symbol.
struct Symbology {
	style: SimpleStyle,
	layers: Vec<geopack_core::SymbolLayer>,
	complexity: Complexity,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct StyleInterpreter {
	flattener: SymbolFlattener,
}

impl StyleInterpreter {
	pub fn new(max_depth: usize) -> Self {
		Self {
			flattener: SymbolFlattener::new(max_depth),
		}
	}

	fn symbology(&self, symbol: &CimSymbol) -> Symbology {
		let flat = self.flattener.flatten(symbol);
		Symbology {
			style: simple_style(&flat),
			layers: symbol_layers(&flat),
			complexity: complexity(&flat),
		}
	}

	/// Interprets `document` for a layer of `geometry_type`.
	///
	/// An unknown geometry type is taken from the symbol kind. Fails when the document has no
	/// layer, no renderer or a renderer other than simple or unique value.
	pub fn interpret(&self, document: &CimDocument, geometry_type: GeometryType) -> Result<StyleConfig> {
		let layer = document.primary_layer().context("document has no layer definitions")?;
		let renderer = layer.renderer.as_ref().context("layer has no renderer")?;

		let mut config = match renderer {
			CimRenderer::Simple(simple) => {
				let symbol = symbol_of(simple.symbol.as_ref()).context("simple renderer without symbol")?;
				let symbology = self.symbology(symbol);
				StyleConfig {
					geometry_type: resolve_geometry_type(geometry_type, Some(symbol)),
					renderer: RendererKind::Simple,
					default_style: symbology.style,
					symbol_layers: symbology.layers,
					unique_values: None,
					labels: None,
					scale_range: None,
					complexity: symbology.complexity,
					fallback: false,
				}
			}
			CimRenderer::UniqueValue(unique) => self.unique_value(unique, geometry_type),
			CimRenderer::Unsupported => bail!("unsupported renderer type"),
		};

		config.labels = labels::labels(layer);
		config.scale_range = labels::scale_range(layer);
		Ok(config)
	}

	fn unique_value(&self, renderer: &CimUniqueValueRenderer, geometry_type: GeometryType) -> StyleConfig {
		let default_symbol = symbol_of(renderer.default_symbol.as_ref());
		let default = default_symbol.map(|symbol| self.symbology(symbol));
		let mut complexity = default.as_ref().map_or(Complexity::Simple, |d| d.complexity);

		let mut first_symbol = default_symbol;
		let mut classes = Vec::new();
		for class in renderer.groups.iter().flat_map(|group| &group.classes) {
			let symbol = symbol_of(class.symbol.as_ref());
			first_symbol = first_symbol.or(symbol);
			let symbology = symbol.map(|symbol| self.symbology(symbol));
			if let Some(symbology) = &symbology {
				complexity = complexity.max(symbology.complexity);
			}
			let (style, symbol_layers) = symbology.map_or_else(|| (SimpleStyle::empty(), Vec::new()), |s| (s.style, s.layers));
			classes.push(UniqueValueClass {
				match_values: class.values.iter().map(|value| value.field_strings()).collect(),
				label: class.label.clone(),
				style,
				symbol_layers,
			});
		}

		// without a default symbol, features outside all classes are not drawn
		let (default_style, symbol_layers) = default.map_or_else(|| (SimpleStyle::empty(), Vec::new()), |d| (d.style, d.layers));
		StyleConfig {
			geometry_type: resolve_geometry_type(geometry_type, first_symbol),
			renderer: RendererKind::UniqueValue,
			default_style,
			symbol_layers,
			unique_values: Some(UniqueValues {
				fields: renderer.fields.clone(),
				classes,
			}),
			labels: None,
			scale_range: None,
			complexity,
			fallback: false,
		}
	}

	/// Reads and interprets a style document. Never fails: unreadable or unusable documents
	/// yield the fallback style.
	pub fn interpret_file(&self, path: &Path, geometry_type: GeometryType) -> StyleConfig {
		let result = CimDocument::from_path(path).and_then(|document| self.interpret(&document, geometry_type));
		match result {
			Ok(config) => {
				debug!("style {path:?}: {:?} renderer, {:?}", config.renderer, config.complexity);
				config
			}
			Err(error) => {
				warn!("using fallback style, cannot interpret {path:?}: {error:#}");
				StyleConfig::fallback(geometry_type)
			}
		}
	}
}

fn resolve_geometry_type(geometry_type: GeometryType, symbol: Option<&CimSymbol>) -> GeometryType {
	match (geometry_type, symbol) {
		(GeometryType::Unknown, Some(symbol)) => geometry_type_of(symbol),
		_ => geometry_type,
	}
}

/// Interprets the style document at `path` with the default depth limit.
pub fn interpret_style_file(path: &Path, geometry_type: GeometryType) -> StyleConfig {
	StyleInterpreter::default().interpret_file(path, geometry_type)
}
